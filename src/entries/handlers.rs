use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::auth::session::{AuthUser, MaybeUser};
use crate::entries::repo::Entry;
use crate::entries::views::{
    encode_title, DetailPage, EditEntryPage, EntryView, IndexPage, NewEntryPage,
};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::forms::EntryForm;
use crate::state::AppState;

/// Home page listing every entry by date.
#[instrument(skip(state, jar))]
pub async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let entries = Entry::list_all(&state.db).await?;
    let (jar, messages) = flash::take(jar);
    let page = IndexPage {
        messages,
        current_user: user.map(|u| u.username),
        entries: entries.into_iter().map(Into::into).collect(),
    };
    Ok((jar, page).into_response())
}

#[instrument(skip(state, jar))]
pub async fn detail(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(title): Path<String>,
) -> Result<Response, AppError> {
    let entry = Entry::find_by_title(&state.db, &title)
        .await?
        .ok_or(AppError::NotFound)?;
    let (jar, messages) = flash::take(jar);
    let page = DetailPage {
        messages,
        can_edit: entry.user_id == user.id,
        current_user: Some(user.username),
        entry: EntryView::from(entry),
    };
    Ok((jar, page).into_response())
}

#[instrument(skip(jar))]
pub async fn new_page(AuthUser(user): AuthUser, jar: CookieJar) -> Response {
    let (jar, messages) = flash::take(jar);
    let page = NewEntryPage {
        messages,
        current_user: Some(user.username),
        errors: Vec::new(),
        form: EntryForm::default(),
    };
    (jar, page).into_response()
}

#[instrument(skip(state, jar, form))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Form(form): Form<EntryForm>,
) -> Result<Response, AppError> {
    let mut errors = form.validate();
    if errors.is_empty() {
        match form.parsed() {
            Some((date, minutes)) => {
                let entry = Entry::create(
                    &state.db,
                    user.id,
                    form.title.trim(),
                    date,
                    minutes,
                    &form.learned,
                    &form.resources,
                )
                .await?;
                info!(entry_id = %entry.id, user_id = %user.id, "entry created");
                let jar = flash::push(jar, Flash::success("You've created a new entry!"));
                return Ok((jar, Redirect::to("/")).into_response());
            }
            None => errors.push("Entry is not valid.".into()),
        }
    }

    warn!(user_id = %user.id, "entry form rejected");
    let (jar, messages) = flash::take(jar);
    let page = NewEntryPage {
        messages,
        current_user: Some(user.username),
        errors,
        form,
    };
    Ok((jar, page).into_response())
}

#[instrument(skip(state, jar))]
pub async fn edit_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(title): Path<String>,
) -> Result<Response, AppError> {
    let entry = owned_entry(&state, &title, user.id).await?;
    let (jar, messages) = flash::take(jar);
    let page = EditEntryPage {
        messages,
        current_user: Some(user.username),
        errors: Vec::new(),
        form: EntryForm::from_entry(&entry),
        title: entry.title,
    };
    Ok((jar, page).into_response())
}

#[instrument(skip(state, jar, form))]
pub async fn edit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(title): Path<String>,
    Form(form): Form<EntryForm>,
) -> Result<Response, AppError> {
    let entry = owned_entry(&state, &title, user.id).await?;

    let mut errors = form.validate();
    if errors.is_empty() {
        match form.parsed() {
            Some((date, minutes)) => {
                let updated = Entry::update(
                    &state.db,
                    entry.id,
                    user.id,
                    form.title.trim(),
                    date,
                    minutes,
                    &form.learned,
                    &form.resources,
                )
                .await?
                .ok_or(AppError::NotFound)?;
                info!(entry_id = %updated.id, user_id = %user.id, "entry edited");
                let jar = flash::push(jar, Flash::success("Edit successful!"));
                let to = format!("/entries/{}", encode_title(&updated.title));
                return Ok((jar, Redirect::to(&to)).into_response());
            }
            None => errors.push("Entry is not valid.".into()),
        }
    }

    warn!(entry_id = %entry.id, user_id = %user.id, "entry edit rejected");
    let (jar, messages) = flash::take(jar);
    let page = EditEntryPage {
        messages,
        current_user: Some(user.username),
        errors,
        title: entry.title,
        form,
    };
    Ok((jar, page).into_response())
}

#[instrument(skip(state, jar))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(title): Path<String>,
) -> Result<Response, AppError> {
    let entry = owned_entry(&state, &title, user.id).await?;
    if !Entry::delete(&state.db, entry.id, user.id).await? {
        return Err(AppError::NotFound);
    }
    info!(entry_id = %entry.id, user_id = %user.id, "entry deleted");
    let jar = flash::push(jar, Flash::success("Entry successfully deleted!"));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Look an entry up by title and require the current user to own it. A
/// non-owner gets the same 404 as a missing title.
async fn owned_entry(state: &AppState, title: &str, user_id: uuid::Uuid) -> Result<Entry, AppError> {
    let entry = Entry::find_by_title(&state.db, title)
        .await?
        .ok_or(AppError::NotFound)?;
    if entry.user_id != user_id {
        warn!(entry_id = %entry.id, user_id = %user_id, "entry owned by another user");
        return Err(AppError::NotFound);
    }
    Ok(entry)
}
