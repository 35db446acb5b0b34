//! Bulk platform availability updates
//!
//! Large dish lists are applied in chunks of [`BATCH_LIMIT`], one SQLite
//! transaction per chunk with a short pause between chunks to keep the pool
//! responsive. A storage failure aborts the run but keeps already committed
//! chunks, and the partial progress is reported instead of hidden.
//!
//! The last successful run can be undone within [`UNDO_WINDOW_SECS`] by
//! replaying the inverse toggle over the same dish list. There is a single
//! undo slot; a new run overwrites it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::watch;
use tracing::{debug, info};

use shared::response::BulkUpdateReport;
use shared::Platform;

use super::availability::apply_platform_change;
use crate::db::repository::dish;
use crate::utils::{AppError, AppResult};

/// Maximum dishes written per transaction
pub const BATCH_LIMIT: usize = 500;
/// Pause between chunk commits
pub const INTER_CHUNK_DELAY: Duration = Duration::from_millis(100);
/// How long the last bulk run stays undoable
pub const UNDO_WINDOW_SECS: i64 = 300;

/// Time source, injectable so the undo window is testable
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Per-chunk result: `errors` counts per-dish rejections (missing dish,
/// gating violation), not storage failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkOutcome {
    pub updated: usize,
    pub errors: usize,
}

/// Storage seam for chunk writes
#[async_trait]
pub trait DishBatchStore: Send + Sync {
    async fn apply_chunk(
        &self,
        owner: &str,
        dish_ids: &[String],
        platform: Platform,
        enabled: bool,
    ) -> AppResult<ChunkOutcome>;
}

/// Production store: one transaction per chunk over the shared pool
pub struct SqlxDishStore {
    pool: SqlitePool,
}

impl SqlxDishStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DishBatchStore for SqlxDishStore {
    async fn apply_chunk(
        &self,
        owner: &str,
        dish_ids: &[String],
        platform: Platform,
        enabled: bool,
    ) -> AppResult<ChunkOutcome> {
        let mut tx = self.pool.begin().await?;
        let mut outcome = ChunkOutcome::default();

        for id in dish_ids {
            let Some(row) = dish::find_row(&mut *tx, owner, id).await? else {
                debug!(dish = %id, "Dish missing or not owned, skipping");
                outcome.errors += 1;
                continue;
            };
            match apply_platform_change(row.availability(), platform, enabled) {
                Ok(next) => {
                    dish::set_availability(&mut *tx, owner, id, next).await?;
                    outcome.updated += 1;
                }
                Err(_) => {
                    debug!(dish = %id, %platform, "Gating rejected toggle, skipping");
                    outcome.errors += 1;
                }
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }
}

/// The last committed bulk run, kept for undo
#[derive(Debug, Clone)]
struct BulkOperation {
    owner: String,
    platform: Platform,
    enabled: bool,
    dish_ids: Vec<String>,
    applied_at: DateTime<Utc>,
}

#[derive(Default)]
struct BulkState {
    last_op: Option<BulkOperation>,
    in_flight: bool,
}

pub struct BulkAvailabilityService {
    store: Arc<dyn DishBatchStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<BulkState>,
    progress: watch::Sender<u8>,
}

impl BulkAvailabilityService {
    pub fn new(store: Arc<dyn DishBatchStore>, clock: Arc<dyn Clock>) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            store,
            clock,
            state: Mutex::new(BulkState::default()),
            progress,
        }
    }

    /// Completion percentage of the current (or last) run
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Toggle `platform` for every dish in `dish_ids`. Only one bulk run may
    /// be active at a time; a successful run becomes the new undo slot.
    pub async fn set_platform(
        &self,
        owner: &str,
        dish_ids: Vec<String>,
        platform: Platform,
        enabled: bool,
    ) -> AppResult<BulkUpdateReport> {
        if dish_ids.is_empty() {
            return Err(AppError::validation("No dish ids given"));
        }
        self.acquire_slot()?;

        let result = self.run_chunks(owner, &dish_ids, platform, enabled).await;

        let mut state = self.state.lock().expect("bulk state lock poisoned");
        state.in_flight = false;
        if result.is_ok() {
            state.last_op = Some(BulkOperation {
                owner: owner.to_string(),
                platform,
                enabled,
                dish_ids,
                applied_at: self.clock.now(),
            });
        }
        result
    }

    /// Replay the inverse of the last committed run. The slot is consumed
    /// whether or not the replay succeeds; only toggles re-applied in the
    /// meantime by other writers are clobbered, which is accepted for a
    /// single-slot undo.
    pub async fn undo_last(&self, owner: &str) -> AppResult<BulkUpdateReport> {
        let op = {
            let mut state = self.state.lock().expect("bulk state lock poisoned");
            if state.in_flight {
                return Err(AppError::Conflict(
                    "A bulk operation is already in progress".to_string(),
                ));
            }
            match &state.last_op {
                Some(op) if op.owner == owner => {}
                _ => return Err(AppError::Conflict("Nothing to undo".to_string())),
            }
            let op = state.last_op.take().expect("checked above");
            if self.clock.now() - op.applied_at
                > chrono::Duration::seconds(UNDO_WINDOW_SECS)
            {
                return Err(AppError::Conflict("Undo window expired".to_string()));
            }
            state.in_flight = true;
            op
        };

        info!(
            platform = %op.platform, dishes = op.dish_ids.len(),
            "Undoing last bulk availability update"
        );
        let result = self
            .run_chunks(owner, &op.dish_ids, op.platform, !op.enabled)
            .await;
        self.state.lock().expect("bulk state lock poisoned").in_flight = false;
        result
    }

    fn acquire_slot(&self) -> AppResult<()> {
        let mut state = self.state.lock().expect("bulk state lock poisoned");
        if state.in_flight {
            return Err(AppError::Conflict(
                "A bulk operation is already in progress".to_string(),
            ));
        }
        state.in_flight = true;
        Ok(())
    }

    async fn run_chunks(
        &self,
        owner: &str,
        dish_ids: &[String],
        platform: Platform,
        enabled: bool,
    ) -> AppResult<BulkUpdateReport> {
        let total = dish_ids.len();
        let chunk_count = total.div_ceil(BATCH_LIMIT);
        let mut report = BulkUpdateReport {
            updated: 0,
            errors: 0,
            chunks_committed: 0,
        };
        self.progress.send_replace(0);

        let mut done = 0usize;
        for (index, chunk) in dish_ids.chunks(BATCH_LIMIT).enumerate() {
            let outcome = self
                .store
                .apply_chunk(owner, chunk, platform, enabled)
                .await
                .map_err(|e| AppError::BulkAborted {
                    chunks_committed: report.chunks_committed,
                    updated: report.updated,
                    errors: report.errors,
                    message: e.to_string(),
                })?;

            report.updated += outcome.updated;
            report.errors += outcome.errors;
            report.chunks_committed += 1;
            done += chunk.len();
            self.progress.send_replace((done * 100 / total) as u8);

            if index + 1 < chunk_count {
                tokio::time::sleep(INTER_CHUNK_DELAY).await;
            }
        }

        info!(
            %platform, enabled, updated = report.updated, errors = report.errors,
            chunks = report.chunks_committed, "Bulk availability update committed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct RecordingStore {
        calls: Mutex<Vec<Vec<String>>>,
        fail_on_call: Option<usize>,
        flags: Mutex<HashMap<String, bool>>,
    }

    impl RecordingStore {
        fn new(fail_on_call: Option<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_call,
                flags: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl DishBatchStore for RecordingStore {
        async fn apply_chunk(
            &self,
            _owner: &str,
            dish_ids: &[String],
            _platform: Platform,
            enabled: bool,
        ) -> AppResult<ChunkOutcome> {
            let call_index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(dish_ids.to_vec());
                calls.len() - 1
            };
            if self.fail_on_call == Some(call_index) {
                return Err(AppError::Database("simulated outage".to_string()));
            }
            let mut flags = self.flags.lock().unwrap();
            for id in dish_ids {
                flags.insert(id.clone(), enabled);
            }
            Ok(ChunkOutcome {
                updated: dish_ids.len(),
                errors: 0,
            })
        }
    }

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Mutex::new(Utc::now()))
        }

        fn advance_secs(&self, secs: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("dish-{i:04}")).collect()
    }

    fn service(store: Arc<RecordingStore>, clock: Arc<ManualClock>) -> BulkAvailabilityService {
        BulkAvailabilityService::new(store, clock)
    }

    #[tokio::test]
    async fn twelve_hundred_dishes_split_into_three_ordered_chunks() {
        let store = Arc::new(RecordingStore::new(None));
        let svc = service(store.clone(), Arc::new(ManualClock::new()));
        let progress = svc.progress();

        let report = svc
            .set_platform("o1", ids(1200), Platform::Zomato, true)
            .await
            .unwrap();

        assert_eq!(report.updated, 1200);
        assert_eq!(report.errors, 0);
        assert_eq!(report.chunks_committed, 3);

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].len(), 500);
        assert_eq!(calls[1].len(), 500);
        assert_eq!(calls[2].len(), 200);
        // ordering preserved across the chunk boundary
        assert_eq!(calls[0][0], "dish-0000");
        assert_eq!(calls[1][0], "dish-0500");
        assert_eq!(calls[2][0], "dish-1000");

        assert_eq!(*progress.borrow(), 100);
    }

    #[tokio::test]
    async fn mid_run_failure_keeps_committed_chunks_and_stops() {
        let store = Arc::new(RecordingStore::new(Some(1)));
        let svc = service(store.clone(), Arc::new(ManualClock::new()));

        let err = svc
            .set_platform("o1", ids(1200), Platform::Zomato, true)
            .await
            .unwrap_err();

        match err {
            AppError::BulkAborted {
                chunks_committed,
                updated,
                ..
            } => {
                assert_eq!(chunks_committed, 1);
                assert_eq!(updated, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // third chunk never attempted, first chunk stayed applied
        assert_eq!(store.calls.lock().unwrap().len(), 2);
        let flags = store.flags.lock().unwrap();
        assert_eq!(flags.len(), 500);
        assert_eq!(flags.get("dish-0000"), Some(&true));
        assert!(!flags.contains_key("dish-0500"));
        drop(flags);

        // a failed run leaves nothing to undo
        let err = svc.undo_last("o1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn undo_replays_the_inverse_and_consumes_the_slot() {
        let store = Arc::new(RecordingStore::new(None));
        let svc = service(store.clone(), Arc::new(ManualClock::new()));

        svc.set_platform("o1", ids(10), Platform::Swiggy, true).await.unwrap();
        let report = svc.undo_last("o1").await.unwrap();
        assert_eq!(report.updated, 10);

        let flags = store.flags.lock().unwrap();
        assert_eq!(flags.get("dish-0000"), Some(&false));
        drop(flags);

        // single slot, already consumed
        let err = svc.undo_last("o1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn undo_overwrites_interim_single_dish_writes() {
        let store = Arc::new(RecordingStore::new(None));
        let svc = service(store.clone(), Arc::new(ManualClock::new()));

        svc.set_platform("o1", ids(3), Platform::Zomato, true).await.unwrap();
        // another writer re-asserts the toggle on one dish before the undo
        store.flags.lock().unwrap().insert("dish-0001".to_string(), true);

        svc.undo_last("o1").await.unwrap();

        // the inverse replay does not know about the interim write
        let flags = store.flags.lock().unwrap();
        assert_eq!(flags.get("dish-0001"), Some(&false));
    }

    #[tokio::test]
    async fn undo_window_expires() {
        let store = Arc::new(RecordingStore::new(None));
        let clock = Arc::new(ManualClock::new());
        let svc = service(store.clone(), clock.clone());

        svc.set_platform("o1", ids(5), Platform::Zomato, false).await.unwrap();
        clock.advance_secs(UNDO_WINDOW_SECS + 1);

        let err = svc.undo_last("o1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // only the report call and nothing from an undo
        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn undo_is_scoped_to_the_tenant_that_ran_it() {
        let store = Arc::new(RecordingStore::new(None));
        let svc = service(store.clone(), Arc::new(ManualClock::new()));

        svc.set_platform("owner-a", ids(5), Platform::Zomato, true).await.unwrap();
        let err = svc.undo_last("owner-b").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // owner-a can still undo afterwards
        svc.undo_last("owner-a").await.unwrap();
    }

    struct SlowStore;

    #[async_trait]
    impl DishBatchStore for SlowStore {
        async fn apply_chunk(
            &self,
            _owner: &str,
            dish_ids: &[String],
            _platform: Platform,
            _enabled: bool,
        ) -> AppResult<ChunkOutcome> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(ChunkOutcome {
                updated: dish_ids.len(),
                errors: 0,
            })
        }
    }

    #[tokio::test]
    async fn concurrent_runs_are_rejected() {
        let svc = Arc::new(BulkAvailabilityService::new(
            Arc::new(SlowStore),
            Arc::new(SystemClock),
        ));

        let first = {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.set_platform("o1", ids(5), Platform::Zomato, true).await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = svc
            .set_platform("o1", ids(5), Platform::Zomato, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        first.await.unwrap().unwrap();
    }

    mod sqlx_store {
        use super::*;
        use crate::db::repository::dish;
        use crate::db::test_support::memory_pool;
        use shared::PlatformAvailability;
        use shared::request::DishCreate;

        fn dish_create(name: &str, availability: PlatformAvailability) -> DishCreate {
            DishCreate {
                name: name.into(),
                price_minor: 10000,
                category: "mains".into(),
                veg: true,
                image: None,
                available: true,
                availability,
            }
        }

        #[tokio::test]
        async fn gating_violations_count_as_errors_not_updates() {
            let pool = memory_pool().await;
            let gated = dish::create(
                &pool,
                "o1",
                dish_create(
                    "Off menu",
                    PlatformAvailability {
                        restaurant: false,
                        zomato: false,
                        swiggy: false,
                        other: false,
                    },
                ),
            )
            .await
            .unwrap();
            let open = dish::create(&pool, "o1", dish_create("On menu", PlatformAvailability::default()))
                .await
                .unwrap();

            let store = SqlxDishStore::new(pool.clone());
            let outcome = store
                .apply_chunk(
                    "o1",
                    &[gated.id.clone(), open.id.clone(), "ghost".to_string()],
                    Platform::Zomato,
                    true,
                )
                .await
                .unwrap();

            assert_eq!(outcome.updated, 1);
            assert_eq!(outcome.errors, 2);

            let reloaded = dish::find_by_id(&pool, "o1", &open.id).await.unwrap().unwrap();
            assert!(reloaded.availability.zomato);
            let still_gated = dish::find_by_id(&pool, "o1", &gated.id).await.unwrap().unwrap();
            assert!(!still_gated.availability.zomato);
        }

        #[tokio::test]
        async fn disabling_restaurant_cascades_in_storage() {
            let pool = memory_pool().await;
            let d = dish::create(
                &pool,
                "o1",
                dish_create(
                    "Everywhere",
                    PlatformAvailability {
                        restaurant: true,
                        zomato: true,
                        swiggy: true,
                        other: false,
                    },
                ),
            )
            .await
            .unwrap();

            let store = SqlxDishStore::new(pool.clone());
            store
                .apply_chunk("o1", &[d.id.clone()], Platform::Restaurant, false)
                .await
                .unwrap();

            let reloaded = dish::find_by_id(&pool, "o1", &d.id).await.unwrap().unwrap();
            assert!(!reloaded.availability.restaurant);
            assert!(!reloaded.availability.zomato);
            assert!(!reloaded.availability.swiggy);
        }
    }
}
