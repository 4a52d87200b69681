//! Activity store operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::query::{fold_location, ActivityFilter, ACTIVITY_COLUMNS};
use super::{now_timestamp, Activity, ActivityPatch, ActivityRow, NewActivity, StoreError};

fn into_activities(rows: Vec<ActivityRow>) -> Result<Vec<Activity>, StoreError> {
    rows.into_iter().map(Activity::try_from).collect()
}

pub async fn search(pool: &SqlitePool, filter: &ActivityFilter) -> Result<Vec<Activity>, StoreError> {
    let (sql, bindings) = filter.to_sql();
    let mut query = sqlx::query_as::<_, ActivityRow>(&sql);
    for binding in &bindings {
        query = query.bind(binding);
    }
    let rows = query.fetch_all(pool).await?;
    into_activities(rows)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Activity>, StoreError> {
    search(pool, &ActivityFilter::default()).await
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Activity, StoreError> {
    let row = sqlx::query_as::<_, ActivityRow>(&format!(
        "SELECT {} FROM activities WHERE id = ?",
        ACTIVITY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)?;

    Activity::try_from(row)
}

/// Insert an already validated activity and return the stored record.
pub async fn create(pool: &SqlitePool, new: &NewActivity) -> Result<Activity, StoreError> {
    let now = now_timestamp();
    let activity = Activity {
        id: Uuid::new_v4().to_string(),
        name: new.name.trim().to_string(),
        description: new.description.trim().to_string(),
        location: new.location.trim().to_string(),
        category: new.category.trim().to_string(),
        seasonal_months: new
            .seasonal_months
            .as_ref()
            .map(|m| m.normalize())
            .unwrap_or_default(),
        price: new.price,
        created_at: now.clone(),
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO activities (id, name, description, location, location_folded, category, seasonal_months, price, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&activity.id)
    .bind(&activity.name)
    .bind(&activity.description)
    .bind(&activity.location)
    .bind(fold_location(&activity.location))
    .bind(&activity.category)
    .bind(serde_json::to_string(&activity.seasonal_months)?)
    .bind(activity.price)
    .bind(&activity.created_at)
    .bind(&activity.updated_at)
    .execute(pool)
    .await?;

    Ok(activity)
}

/// Merge `patch` into the stored activity. Returns the number of
/// modified records (0 when the patch changed nothing).
///
/// Read-merge-write without a transaction: a concurrent update between
/// the read and the write is overwritten.
pub async fn update(pool: &SqlitePool, id: &str, patch: &ActivityPatch) -> Result<u64, StoreError> {
    let mut activity = get(pool, id).await?;
    if !activity.apply(patch) {
        return Ok(0);
    }
    activity.updated_at = now_timestamp();

    let result = sqlx::query(
        r#"
        UPDATE activities
        SET name = ?, description = ?, location = ?, location_folded = ?, category = ?, seasonal_months = ?, price = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&activity.name)
    .bind(&activity.description)
    .bind(&activity.location)
    .bind(fold_location(&activity.location))
    .bind(&activity.category)
    .bind(serde_json::to_string(&activity.seasonal_months)?)
    .bind(activity.price)
    .bind(&activity.updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    // Deleted between the read and the write
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }

    Ok(result.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub async fn delete_all(pool: &SqlitePool) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM activities").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Distinct location values, sorted.
pub async fn distinct_locations(pool: &SqlitePool) -> Result<Vec<String>, StoreError> {
    let locations: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT location FROM activities ORDER BY location")
            .fetch_all(pool)
            .await?;
    Ok(locations)
}

pub async fn count(pool: &SqlitePool) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activities")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
