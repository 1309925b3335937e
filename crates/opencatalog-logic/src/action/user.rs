use crate::context::Context;
use crate::dispatch::CatalogActions;
use crate::error::LogicError;
use crate::schema::{optional_name, optional_str, required_name, required_str};
use opencatalog_core::{Activity, Password, User};
use serde_json::{Value, json};

const PASSWORD_MIN_LEN: usize = 4;

/// Password field extraction with tri-state semantics: the key must be
/// present; an empty string means "leave the password unchanged"; anything
/// that is not a string fails validation.
fn extract_password(payload: &Value) -> Result<Option<String>, LogicError> {
    match payload.get("password") {
        None => Err(LogicError::missing_value("password")),
        Some(Value::Null) => Err(LogicError::missing_value("password")),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) if s.len() < PASSWORD_MIN_LEN => Err(LogicError::validation(
            "password",
            format!("Your password must be {PASSWORD_MIN_LEN} characters or longer"),
        )),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(LogicError::validation("password", "Passwords must be strings")),
    }
}

/// Dictized user representation. Never contains the password or reset
/// key; the API key only when the caller is entitled to it.
fn dictize_user(user: &User, include_apikey: bool) -> Value {
    let mut dict = json!({
        "id": user.id,
        "name": user.name,
        "fullname": user.fullname,
        "about": user.about,
        "email": user.email,
        "sysadmin": user.sysadmin,
        "created": user.created.to_string(),
    });
    if include_apikey {
        dict["apikey"] = json!(user.apikey);
    }
    dict
}

impl CatalogActions {
    pub async fn user_create(&self, _ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let name = required_name(&payload, "name")?;
        if self.storage.get_user_by_name(&name).await?.is_some() {
            return Err(LogicError::validation(
                "name",
                "That login name is not available",
            ));
        }
        let email = required_str(&payload, "email")?;
        let password = extract_password(&payload)?
            .ok_or_else(|| LogicError::missing_value("password"))?;

        let mut user = User::new(name, email, Password::new(password));
        user.fullname = optional_str(&payload, "fullname")?;
        user.about = optional_str(&payload, "about")?;

        self.storage.create_user(&user).await?;
        tracing::info!(id = %user.id, name = %user.name, "created user");
        Ok(dictize_user(&user, false))
    }

    pub async fn user_show(&self, ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let user = self
            .user_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("user", &id))?;

        let include_apikey = match &ctx.user {
            Some(actor_name) => match self.user_by_id_or_name(actor_name).await? {
                Some(actor) => actor.sysadmin || actor.id == user.id,
                None => false,
            },
            None => false,
        };
        Ok(dictize_user(&user, include_apikey))
    }

    /// Updates a user account.
    ///
    /// `id` (id or name) and `email` are required even when unchanged.
    /// The password key must be present; an empty string leaves the stored
    /// password as it is. Emits a "changed user" activity attributed to
    /// the acting user, or to the updated account itself for untracked
    /// calls.
    pub async fn user_update(&self, ctx: &Context, payload: Value) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let mut user = self
            .user_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("user", &id))?;

        let email = required_str(&payload, "email")?;
        let new_password = extract_password(&payload)?;

        if let Some(name) = optional_name(&payload, "name")?
            && name != user.name
        {
            if let Some(existing) = self.storage.get_user_by_name(&name).await?
                && existing.id != user.id
            {
                return Err(LogicError::validation(
                    "name",
                    "That login name is not available",
                ));
            }
            user.name = name;
        }

        user.email = email;
        if let Some(password) = new_password {
            user.password = Password::new(password);
        }
        if let Some(fullname) = optional_str(&payload, "fullname")? {
            user.fullname = Some(fullname);
        }
        if let Some(about) = optional_str(&payload, "about")? {
            user.about = Some(about);
        }

        self.storage.update_user(&user).await?;

        let actor_id = match &ctx.user {
            Some(name) => self
                .user_by_id_or_name(name)
                .await?
                .map(|actor| actor.id)
                .unwrap_or_else(|| user.id.clone()),
            None => user.id.clone(),
        };
        self.storage
            .append_activity(&Activity::changed_user(actor_id, &user.id))
            .await?;

        tracing::info!(id = %user.id, name = %user.name, "updated user");
        Ok(dictize_user(&user, false))
    }

    /// Replaces a user's API key with a fresh one.
    pub async fn user_generate_apikey(
        &self,
        ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let mut user = self
            .user_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("user", &id))?;

        if !ctx.ignore_auth {
            let actor_name = ctx.user.as_ref().ok_or(LogicError::NotAuthorized)?;
            let actor = self
                .user_by_id_or_name(actor_name)
                .await?
                .ok_or(LogicError::NotAuthorized)?;
            if !(actor.sysadmin || actor.id == user.id) {
                return Err(LogicError::NotAuthorized);
            }
        }

        user.regenerate_apikey();
        self.storage.update_user(&user).await?;
        tracing::info!(id = %user.id, "regenerated api key");
        Ok(dictize_user(&user, true))
    }

    /// Returns the site user, creating it on first call.
    pub async fn get_site_user(&self, _ctx: &Context, _payload: Value) -> Result<Value, LogicError> {
        let user = self.site_user().await?;
        Ok(dictize_user(&user, true))
    }

    /// Activities about a user, newest first.
    pub async fn user_activity_list(
        &self,
        _ctx: &Context,
        payload: Value,
    ) -> Result<Value, LogicError> {
        let id = required_str(&payload, "id")?;
        let user = self
            .user_by_id_or_name(&id)
            .await?
            .ok_or_else(|| LogicError::not_found("user", &id))?;
        let activities = self.storage.activity_list(&user.id).await?;
        Ok(serde_json::to_value(activities)
            .map_err(|e| opencatalog_storage::StorageError::internal(e.to_string()))?)
    }
}
