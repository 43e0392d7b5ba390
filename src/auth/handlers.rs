use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::auth::session::{self, AuthUser, MaybeUser, SessionKeys};
use crate::auth::views::{LoginPage, RegisterPage};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::forms::{LoginForm, RegisterForm};
use crate::state::AppState;

#[instrument(skip(jar))]
pub async fn register_page(MaybeUser(user): MaybeUser, jar: CookieJar) -> Response {
    let (jar, messages) = flash::take(jar);
    let page = RegisterPage {
        messages,
        current_user: user.map(|u| u.username),
        errors: Vec::new(),
        form: RegisterForm::default(),
    };
    (jar, page).into_response()
}

#[instrument(skip(state, jar, form))]
pub async fn register(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
    Form(mut form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    form.email = form.email.trim().to_lowercase();

    let mut errors = form.validate();
    if errors.is_empty() {
        // Ensure username and email are not taken
        if User::find_by_username(&state.db, &form.username).await?.is_some() {
            errors.push("User with that name already exists.".into());
        }
        if User::find_by_email(&state.db, &form.email).await?.is_some() {
            errors.push("User with that email already exists.".into());
        }
    }

    if !errors.is_empty() {
        warn!(email = %form.email, "registration rejected");
        let (jar, messages) = flash::take(jar);
        form.password = String::new();
        form.password2 = String::new();
        let page = RegisterPage {
            messages,
            current_user: user.map(|u| u.username),
            errors,
            form,
        };
        return Ok((jar, page).into_response());
    }

    let hash = hash_password(&form.password)?;
    let created = User::create(&state.db, &form.username, &form.email, &hash).await?;

    info!(user_id = %created.id, email = %created.email, "user registered");
    let jar = flash::push(
        jar,
        Flash::success(format!("User with email {} created.", created.email)),
    );
    Ok((jar, Redirect::to("/")).into_response())
}

#[instrument(skip(jar))]
pub async fn login_page(MaybeUser(user): MaybeUser, jar: CookieJar) -> Response {
    let (jar, messages) = flash::take(jar);
    let page = LoginPage {
        messages,
        current_user: user.map(|u| u.username),
        errors: Vec::new(),
        form: LoginForm::default(),
    };
    (jar, page).into_response()
}

#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
    jar: CookieJar,
    Form(mut form): Form<LoginForm>,
) -> Result<Response, AppError> {
    form.email = form.email.trim().to_lowercase();

    let errors = form.validate();
    if !errors.is_empty() {
        let (jar, messages) = flash::take(jar);
        form.password = String::new();
        let page = LoginPage {
            messages,
            current_user: current.map(|u| u.username),
            errors,
            form,
        };
        return Ok((jar, page).into_response());
    }

    let user = User::find_by_email(&state.db, &form.email).await?;
    let verified = match &user {
        Some(u) => verify_password(&form.password, &u.password_hash)?,
        None => false,
    };

    match user {
        // One message for both unknown email and wrong password
        Some(u) if verified => {
            let keys = SessionKeys::from_ref(&state);
            let token = keys.sign(u.id, &u.username)?;
            info!(user_id = %u.id, email = %u.email, "user logged in");
            let jar = jar.add(session::session_cookie(token));
            let jar = flash::push(
                jar,
                Flash::success(format!("You've been logged in with your email, {}!", u.email)),
            );
            Ok((jar, Redirect::to("/")).into_response())
        }
        _ => {
            warn!(email = %form.email, "login failed");
            let jar = flash::push(jar, Flash::error("Your email or password do not match!"));
            Ok((jar, Redirect::to("/login")).into_response())
        }
    }
}

#[instrument(skip(jar))]
pub async fn logout(AuthUser(user): AuthUser, jar: CookieJar) -> Response {
    info!(user_id = %user.id, "user logged out");
    let jar = jar.remove(session::clear_session());
    let jar = flash::push(jar, Flash::success("You've been logged out. Come back soon!"));
    (jar, Redirect::to("/")).into_response()
}
