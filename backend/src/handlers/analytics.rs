//! HTTP handlers for the dashboard endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::analytics::{AnalyticsService, OperationsDashboard, OperationsFilter};
use crate::AppState;
use shared::models::{Role, SalesBreakdown, SalesFilter};
use shared::types::{local_date, DateRange, TimeDivision};

/// Sales dashboard query parameters. Menu ids arrive comma-separated
/// so the whole filter fits in a query string.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub menu_item_ids: Option<String>,
    pub time_division: Option<String>,
}

/// Operations dashboard query parameters; the KPI order set takes the
/// same menu and time-of-day filters as the sales dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct OperationsQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub menu_item_ids: Option<String>,
    pub time_division: Option<String>,
    /// Snapshot date; defaults to today in Jakarta
    pub stock_date: Option<NaiveDate>,
}

fn parse_menu_ids(raw: &Option<String>) -> AppResult<Option<Vec<Uuid>>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => {
            let ids = raw
                .split(',')
                .map(|part| Uuid::parse_str(part.trim()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| AppError::Validation {
                    field: "menu_item_ids".to_string(),
                    message: "Expected comma-separated UUIDs".to_string(),
                })?;
            Ok(Some(ids))
        }
        _ => Ok(None),
    }
}

fn parse_division(raw: &Option<String>) -> AppResult<Option<TimeDivision>> {
    match raw {
        Some(raw) => Ok(Some(TimeDivision::parse(raw).ok_or_else(|| {
            AppError::Validation {
                field: "time_division".to_string(),
                message: "Expected one of: morning, lunch, after_lunch, afternoon".to_string(),
            }
        })?)),
        None => Ok(None),
    }
}

/// Sales dashboard (admin and manager)
pub async fn sales_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<SalesBreakdown>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;

    let filter = SalesFilter {
        range: DateRange {
            start: query.start,
            end: query.end,
        },
        menu_item_ids: parse_menu_ids(&query.menu_item_ids)?,
        time_division: parse_division(&query.time_division)?,
    };

    let service = AnalyticsService::new(state.db);
    let dashboard = service.sales_dashboard(filter).await?;

    Ok(Json(dashboard))
}

/// Operations dashboard (admin and manager)
pub async fn operations_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<OperationsQuery>,
) -> AppResult<Json<OperationsDashboard>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;

    let stock_date = query
        .stock_date
        .unwrap_or_else(|| local_date(chrono::Utc::now()));

    let filter = OperationsFilter {
        range: DateRange {
            start: query.start,
            end: query.end,
        },
        menu_item_ids: parse_menu_ids(&query.menu_item_ids)?,
        time_division: parse_division(&query.time_division)?,
    };

    let service = AnalyticsService::new(state.db);
    let dashboard = service.operations_dashboard(filter, stock_date).await?;

    Ok(Json(dashboard))
}
