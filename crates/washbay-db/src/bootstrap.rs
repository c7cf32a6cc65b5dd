//! Explicit startup and data-migration steps.
//!
//! These run from deployment code, once, right after `run_migrations`.
//! Nothing in here is triggered lazily from a read path.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::DbResult;

/// Make sure the free default subscription plan exists.
///
/// Idempotent: keyed on the plan name, a second run is a no-op. New
/// tenants are attached to this plan until they pick a paid one.
pub async fn ensure_default_plan(pool: &PgPool) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscription_plans (id, name, price, max_employees, is_default, created_at)
        VALUES ($1, 'Starter', $2, 2, TRUE, NOW())
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(uuid::Uuid::now_v7())
    .bind(Decimal::ZERO)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        info!("default subscription plan created");
    }
    Ok(())
}

/// Fold the retired fine-grained in-progress statuses into WORK_STARTED.
///
/// One-time migration for databases created before the status model was
/// simplified. Only the current status column is rewritten; history
/// entries keep their original labels, which readers tolerate.
pub async fn fold_legacy_statuses(pool: &PgPool) -> DbResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET status = 'WORK_STARTED', updated_at = NOW()
        WHERE status IN ('IN_PROGRESS', 'WASHING', 'DRYING')
        "#,
    )
    .execute(pool)
    .await?;

    let folded = result.rows_affected();
    if folded > 0 {
        info!(folded, "legacy job statuses folded into WORK_STARTED");
    }
    Ok(folded)
}
