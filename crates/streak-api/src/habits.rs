use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use streak_types::api::{Claims, CreateHabitRequest, DeleteResponse, ToggleCheckmarkRequest};
use streak_types::models::{DAYS_TRACKED, Habit};

use crate::auth::AppState;
use crate::error::ApiError;

/// Month and year arrive as raw strings so that absent or non-numeric values
/// produce a validation error with a client-facing message instead of a bare
/// framework rejection.
#[derive(Debug, Deserialize)]
pub struct HabitListQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// `GET /habits?month=&year=`: the caller's habits created in the displayed
/// month, newest first. `month` is the zero-based month index the dashboard
/// cursor uses on the wire (0 = January .. 11 = December).
pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitListQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let (month, year) = parse_month_year(&query)?;
    let (start, end) = month_range(month, year)
        .ok_or_else(|| ApiError::validation("invalid month"))?;

    let db = state.clone();
    let email = claims.email.clone();
    let habits = tokio::task::spawn_blocking(move || {
        db.db.list_habits_in_range(&email, start, end)
    })
    .await??;

    Ok(Json(habits))
}

/// `POST /habits`: create a habit with a fresh 31-slot checkmark array.
pub async fn create_habit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateHabitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("habit name is required"));
    }
    let created_at = parse_created_at(req.created_at.as_deref())?;

    let habit = Habit {
        id: Uuid::new_v4(),
        owner_email: claims.email.clone(),
        name: name.to_string(),
        checkmarks: vec![false; DAYS_TRACKED],
        created_at,
    };

    let db = state.clone();
    let stored = habit.clone();
    tokio::task::spawn_blocking(move || db.db.insert_habit(&stored)).await??;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// `PUT /habits/{habit_id}/checkmarks`: flip one day slot and return the
/// full updated habit. The flip itself is a targeted single-index update
/// performed under the connection lock.
pub async fn toggle_checkmark(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ToggleCheckmarkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.day_index >= DAYS_TRACKED {
        return Err(ApiError::validation("day index out of range"));
    }

    let db = state.clone();
    let id = habit_id.to_string();
    let email = claims.email.clone();
    let updated = tokio::task::spawn_blocking(move || -> Result<Habit, ApiError> {
        let habit = db.db.get_habit(&id)?.ok_or(ApiError::NotFound("habit"))?;
        if habit.owner_email != email {
            return Err(ApiError::Forbidden);
        }
        db.db
            .toggle_checkmark(&id, req.day_index)?
            .ok_or(ApiError::NotFound("habit"))
    })
    .await??;

    Ok(Json(updated))
}

/// `DELETE /habits/{habit_id}`: permanent delete; a missing id is a
/// success, not an error.
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = habit_id.to_string();
    let email = claims.email.clone();
    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        match db.db.get_habit(&id)? {
            None => Ok(()),
            Some(habit) if habit.owner_email != email => Err(ApiError::Forbidden),
            Some(_) => {
                db.db.delete_habit(&id)?;
                Ok(())
            }
        }
    })
    .await??;

    Ok(Json(DeleteResponse { success: true }))
}

fn parse_month_year(query: &HabitListQuery) -> Result<(u32, i32), ApiError> {
    let (Some(month), Some(year)) = (query.month.as_deref(), query.year.as_deref()) else {
        return Err(ApiError::validation("month and year are required"));
    };
    let month: u32 = month
        .parse()
        .map_err(|_| ApiError::validation("month and year must be numeric"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| ApiError::validation("month and year must be numeric"))?;
    if month > 11 {
        return Err(ApiError::validation("invalid month"));
    }
    Ok((month, year))
}

/// Inclusive start and exclusive end of the month named by a zero-based
/// month index and a year.
fn month_range(month: u32, year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month + 1, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((
        first.and_hms_opt(0, 0, 0)?.and_utc(),
        next.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

/// An absent timestamp defaults to now; a present one must parse as
/// RFC 3339 or as a plain `YYYY-MM-DD` date at midnight UTC.
fn parse_created_at(raw: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // NaiveDate always has a valid midnight
        return Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }
    Err(ApiError::validation("invalid date"))
}
