use askama::Template;

use crate::flash::Flash;
use crate::forms::{LoginForm, RegisterForm};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub messages: Vec<Flash>,
    pub current_user: Option<String>,
    pub errors: Vec<String>,
    pub form: LoginForm,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub messages: Vec<Flash>,
    pub current_user: Option<String>,
    pub errors: Vec<String>,
    pub form: RegisterForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_page_round_trips_values_and_errors() {
        let page = RegisterPage {
            messages: vec![],
            current_user: None,
            errors: vec!["Passwords must match.".into()],
            form: RegisterForm {
                username: "dave_99".into(),
                email: "dave@test.com".into(),
                password: String::new(),
                password2: String::new(),
            },
        };
        let html = page.render().expect("render register");
        assert!(html.contains("dave_99"));
        assert!(html.contains("dave@test.com"));
        assert!(html.contains("Passwords must match."));
        // Passwords are never echoed back
        assert!(!html.contains(r#"name="password" value"#));
    }

    #[test]
    fn login_page_shows_flash_messages() {
        let page = LoginPage {
            messages: vec![Flash::error("Your email or password do not match!")],
            current_user: None,
            errors: vec![],
            form: LoginForm::default(),
        };
        let html = page.render().expect("render login");
        assert!(html.contains("Your email or password do not match!"));
        assert!(html.contains(r#"class="flash error""#));
    }
}
