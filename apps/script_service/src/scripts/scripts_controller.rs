use axum::{
    extract::Path,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use super::script_record::{NewScript, ScriptRecord};
use crate::{
    app_module::AppState, auth::auth_middleware::MaybeAuthUser, error::AppResult, extract::AppJson,
};

pub fn scripts_router() -> Router {
    Router::new()
        .route("/", get(list_scripts).post(save_script))
        .route(
            "/:id",
            get(get_script).put(update_script).delete(delete_script),
        )
}

fn owner(user: &MaybeAuthUser) -> Option<&str> {
    user.0.as_ref().map(|u| u.user_id.as_str())
}

pub async fn list_scripts(
    Extension(ctx): Extension<AppState>,
    user: MaybeAuthUser,
) -> AppResult<Json<Vec<ScriptRecord>>> {
    let store = ctx.script_store(owner(&user))?;
    Ok(Json(store.list().await?))
}

pub async fn get_script(
    Extension(ctx): Extension<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ScriptRecord>> {
    let store = ctx.script_store(owner(&user))?;
    Ok(Json(store.get(&id).await?))
}

pub async fn save_script(
    Extension(ctx): Extension<AppState>,
    user: MaybeAuthUser,
    AppJson(script): AppJson<NewScript>,
) -> AppResult<(StatusCode, Json<ScriptRecord>)> {
    let store = ctx.script_store(owner(&user))?;
    let record = store.save(script).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_script(
    Extension(ctx): Extension<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<String>,
    AppJson(script): AppJson<NewScript>,
) -> AppResult<Json<ScriptRecord>> {
    let store = ctx.script_store(owner(&user))?;
    Ok(Json(store.update(&id, script).await?))
}

pub async fn delete_script(
    Extension(ctx): Extension<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let store = ctx.script_store(owner(&user))?;
    store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
