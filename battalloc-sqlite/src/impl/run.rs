use crate::{
    Db, Error,
    types::{self, ResultRow, RunRow},
};
use battalloc_core::{
    models::{AllocationResult, AllocationRun, BatteryId, RunId, RunSummary, Version},
    ports::RunRepository,
};
use sqlx::SqliteConnection;
use time::Date;
use tracing::{Level, event};

/// The greatest saved version of (battery, day), if any.
async fn latest_version(
    conn: &mut SqliteConnection,
    battery_id: &BatteryId,
    day: Date,
) -> Result<Option<Version>, Error> {
    sqlx::query_scalar::<_, Option<i64>>(
        r#"
        select
            max(version)
        from
            allocation_run
        where
            battery_id = $1
        and
            day = $2
        "#,
    )
    .bind(battery_id.as_str())
    .bind(day)
    .fetch_one(conn)
    .await?
    .map(types::version)
    .transpose()
}

fn next_after(latest: Option<Version>) -> Result<Version, Error> {
    match latest {
        None => Ok(Version::FIRST),
        Some(version) => version
            .next()
            .ok_or_else(|| Error::Corrupt(format!("version {version} cannot be incremented"))),
    }
}

impl RunRepository for Db {
    async fn next_version(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> Result<Version, Self::Error> {
        let mut conn = self.reader.acquire().await?;
        next_after(latest_version(&mut conn, battery_id, day).await?)
    }

    async fn save_run(&self, run: &AllocationRun) -> Result<(), Self::Error> {
        let conflict = || Error::VersionConflict {
            battery_id: run.battery_id.clone(),
            day: run.day,
            version: run.version,
        };

        // Dropping the transaction without committing rolls it back, so an
        // early return (or a dropped future) leaves nothing behind.
        let mut tx = self.writer.begin().await?;

        let expected = next_after(latest_version(&mut tx, &run.battery_id, run.day).await?)?;
        if run.version != expected {
            event!(
                Level::WARN,
                battery_id = %run.battery_id,
                day = %run.day,
                version = %run.version,
                expected = %expected,
                "rejected run with a stale version"
            );
            return Err(conflict());
        }

        let inserted = sqlx::query(
            r#"
            insert into
                allocation_run (id, battery_id, day, method, version, executed_at)
            values
                ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(run.id.to_string())
        .bind(run.battery_id.as_str())
        .bind(run.day)
        .bind(run.method.as_str())
        .bind(i64::from(run.version.get()))
        .bind(run.executed_at)
        .execute(&mut *tx)
        .await;
        match inserted {
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                return Err(conflict());
            }
            other => other?,
        };

        if !run.results.is_empty() {
            let run_id = run.id.to_string();
            let mut query_builder = sqlx::QueryBuilder::new(
                "insert into allocation_result (run_id, position, well_id, oil, gas, water) ",
            );
            query_builder.push_values(
                run.results.iter().enumerate(),
                |mut b, (position, result)| {
                    b.push_bind(run_id.as_str())
                        .push_bind(position as i64)
                        .push_bind(result.well_id.as_str())
                        .push_bind(result.allocated.oil.thousandths())
                        .push_bind(result.allocated.gas.thousandths())
                        .push_bind(result.allocated.water.thousandths());
                },
            );
            query_builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_results(
        &self,
        battery_id: &BatteryId,
        day: Date,
        version: Version,
    ) -> Result<Vec<AllocationResult>, Self::Error> {
        sqlx::query_as::<_, ResultRow>(
            r#"
            select
                result.well_id, run.day, run.method, run.version,
                result.oil, result.gas, result.water
            from
                allocation_result result
            join
                allocation_run run on run.id = result.run_id
            where
                run.battery_id = $1
            and
                run.day = $2
            and
                run.version = $3
            order by
                result.position
            "#,
        )
        .bind(battery_id.as_str())
        .bind(day)
        .bind(i64::from(version.get()))
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(AllocationResult::try_from)
        .collect()
    }

    async fn get_run(&self, run_id: RunId) -> Result<Option<AllocationRun>, Self::Error> {
        let run_id = run_id.to_string();
        let mut conn = self.reader.acquire().await?;

        let Some(row) = sqlx::query_as::<_, RunRow>(
            r#"
            select
                id, battery_id, day, method, version, executed_at
            from
                allocation_run
            where
                id = $1
            "#,
        )
        .bind(run_id.as_str())
        .fetch_optional(&mut *conn)
        .await?
        else {
            return Ok(None);
        };

        let results = sqlx::query_as::<_, ResultRow>(
            r#"
            select
                result.well_id, run.day, run.method, run.version,
                result.oil, result.gas, result.water
            from
                allocation_result result
            join
                allocation_run run on run.id = result.run_id
            where
                run.id = $1
            order by
                result.position
            "#,
        )
        .bind(run_id.as_str())
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(AllocationResult::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(AllocationRun {
            id: types::run_id(&row.id)?,
            day: row.day,
            battery_id: types::battery_id(row.battery_id)?,
            method: row.method,
            version: types::version(row.version)?,
            executed_at: row.executed_at,
            results,
        }))
    }

    async fn list_runs(
        &self,
        battery_id: &BatteryId,
        day: Date,
    ) -> Result<Vec<RunSummary>, Self::Error> {
        sqlx::query_as::<_, RunRow>(
            r#"
            select
                id, battery_id, day, method, version, executed_at
            from
                allocation_run
            where
                battery_id = $1
            and
                day = $2
            order by
                version
            "#,
        )
        .bind(battery_id.as_str())
        .bind(day)
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(RunSummary::try_from)
        .collect()
    }
}
