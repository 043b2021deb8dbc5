//! Navigation and UI string endpoints.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::i18n;
use crate::models::Language;
use crate::navigation::{medical_file_sections, menu, MenuItem, View};

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub menu: Vec<MenuItem>,
    pub medical_file: Vec<MenuItem>,
}

/// `GET /api/navigation/menu?lang=`
pub async fn menu_items(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<MenuResponse>, ApiError> {
    let lang = ctx.language(query.lang);
    Ok(Json(MenuResponse {
        menu: menu(lang),
        medical_file: medical_file_sections(lang),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedView {
    pub view: View,
    pub path: &'static str,
    pub label: &'static str,
    /// Target of "back"; absent on home.
    pub back: Option<&'static str>,
}

/// `GET /api/navigation/resolve?path=`: view behind a client path.
pub async fn resolve(
    State(ctx): State<ApiContext>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedView>, ApiError> {
    let lang = ctx.language(query.lang);
    let view = View::from_path(&query.path)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown view: {}", query.path)))?;
    Ok(Json(ResolvedView {
        view,
        path: view.path(),
        label: view.label(lang),
        back: view.parent().map(View::path),
    }))
}

/// `GET /api/strings?lang=`: the UI string table.
pub async fn strings(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<HashMap<&'static str, &'static str>>, ApiError> {
    Ok(Json(i18n::strings(ctx.language(query.lang))))
}
