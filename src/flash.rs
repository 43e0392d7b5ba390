use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "learnlog_flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// CSS class used by the templates.
    pub fn class(&self) -> &'static str {
        match self.level {
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

/// Queue a message onto the outgoing jar. Messages accumulate until the next
/// page render drains them with [`take`].
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    let mut queued = peek(&jar);
    queued.push(flash);
    // Serializing a list of plain structs cannot fail
    let value = serde_json::to_string(&queued).unwrap_or_default();
    let cookie = Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

/// Drain all queued messages, clearing the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    let queued = peek(&jar);
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    (jar, queued)
}

fn peek(jar: &CookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_take_drains_the_queue() {
        let jar = CookieJar::new();
        let jar = push(jar, Flash::success("entry created"));
        let jar = push(jar, Flash::error("something else"));

        let (jar, messages) = take(jar);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Flash::success("entry created"));
        assert_eq!(messages[1], Flash::error("something else"));

        // Drained: the cookie now carries a removal entry, not the payload
        let (_, messages) = take(jar);
        assert!(messages.is_empty());
    }

    #[test]
    fn take_on_empty_jar_yields_nothing() {
        let (_, messages) = take(CookieJar::new());
        assert!(messages.is_empty());
    }

    #[test]
    fn garbage_cookie_value_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "not json"));
        let (_, messages) = take(jar);
        assert!(messages.is_empty());
    }

    #[test]
    fn levels_map_to_css_classes() {
        assert_eq!(Flash::success("x").class(), "success");
        assert_eq!(Flash::error("x").class(), "error");
    }
}
