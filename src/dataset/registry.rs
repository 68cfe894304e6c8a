use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use super::infer::infer_fields;
use super::params::{resolve_params, substitute_params};
use super::types::{Dataset, DatasetCache, DatasetDef, DatasetPatch};
use super::{DatasetError, DatasetResult, QueryParams, Record};
use crate::executor::{ExecutorResult, QueryExecutor, QueryResult};
use crate::sql::gate_query;

/// Outcome of one dataset in a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    pub dataset_id: String,
    pub name: String,
    /// Row count on success.
    pub outcome: DatasetResult<usize>,
}

/// A gate-approved query waiting to run.
struct PreparedQuery {
    dataset_id: String,
    sql: String,
}

/// Owns dataset definitions, the result cache, loading flags and errors.
///
/// Definitions keep insertion order. Cache, loading and error state are
/// keyed by dataset id and hold at most one entry per id.
pub struct DatasetRegistry {
    executor: Arc<dyn QueryExecutor>,
    datasets: Vec<Dataset>,
    cache: HashMap<String, DatasetCache>,
    loading: HashSet<String>,
    errors: HashMap<String, DatasetError>,
}

impl DatasetRegistry {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            datasets: Vec::new(),
            cache: HashMap::new(),
            loading: HashSet::new(),
            errors: HashMap::new(),
        }
    }

    pub fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.executor
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Register a dataset under a fresh `ds_<time36>_<rand4>` id.
    pub fn add_dataset(&mut self, def: DatasetDef) -> &Dataset {
        let mut id = new_dataset_id();
        while self.get_dataset(&id).is_some() {
            id = new_dataset_id();
        }
        let index = self.datasets.len();
        self.datasets.push(def.into_dataset(id));
        &self.datasets[index]
    }

    /// Merge `patch` into a dataset. Returns `false` for an unknown id.
    ///
    /// Setting `sql_query` evicts the cached result and any recorded error.
    pub fn update_dataset(&mut self, id: &str, patch: DatasetPatch) -> bool {
        let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == id) else {
            return false;
        };
        let query_changed = patch.sql_query.is_some();
        patch.apply_to(dataset);
        if query_changed {
            self.cache.remove(id);
            self.errors.remove(id);
        }
        true
    }

    /// Remove a dataset and everything recorded for it.
    ///
    /// Elements that still reference the id are left alone; they read an
    /// empty data view from then on.
    pub fn remove_dataset(&mut self, id: &str) -> Option<Dataset> {
        let index = self.datasets.iter().position(|d| d.id == id)?;
        self.cache.remove(id);
        self.errors.remove(id);
        self.loading.remove(id);
        Some(self.datasets.remove(index))
    }

    pub fn get_dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Replace all definitions. Cache and errors are dropped.
    pub fn load_datasets(&mut self, datasets: Vec<Dataset>) {
        self.datasets = datasets;
        self.cache.clear();
        self.errors.clear();
    }

    /// Drop definitions, cache, errors and loading flags.
    pub fn clear_datasets(&mut self) {
        self.datasets.clear();
        self.cache.clear();
        self.errors.clear();
        self.loading.clear();
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run one dataset and cache its rows.
    ///
    /// Every failure is recorded for [`get_dataset_error`](Self::get_dataset_error)
    /// and returned. The loading flag is cleared on every path.
    pub async fn execute_dataset(
        &mut self,
        id: &str,
        params: Option<&QueryParams>,
    ) -> DatasetResult<&DatasetCache> {
        let prepared = self.prepare(id, params)?;
        let outcome = self.executor.execute(&prepared.sql, &[]).await;
        self.finish(prepared, outcome)
    }

    /// Run every dataset concurrently and wait for all of them.
    ///
    /// One failing dataset never stops the others. Summaries come back in
    /// registration order.
    pub async fn execute_all_datasets(
        &mut self,
        params: Option<&QueryParams>,
    ) -> Vec<ExecutionSummary> {
        let ids: Vec<(String, String)> = self
            .datasets
            .iter()
            .map(|d| (d.id.clone(), d.name.clone()))
            .collect();

        let mut outcomes: Vec<Option<DatasetResult<usize>>> = vec![None; ids.len()];
        let mut pending = Vec::new();
        for (i, (id, _)) in ids.iter().enumerate() {
            match self.prepare(id, params) {
                Ok(prepared) => pending.push((i, prepared)),
                Err(e) => outcomes[i] = Some(Err(e)),
            }
        }

        let futures: Vec<_> = pending
            .into_iter()
            .map(|(i, prepared)| {
                let executor = Arc::clone(&self.executor);
                async move {
                    let outcome = executor.execute(&prepared.sql, &[]).await;
                    (i, prepared, outcome)
                }
            })
            .collect();

        for (i, prepared, outcome) in futures::future::join_all(futures).await {
            outcomes[i] = Some(self.finish(prepared, outcome).map(|cache| cache.rows.len()));
        }

        ids.into_iter()
            .zip(outcomes)
            .map(|((dataset_id, name), outcome)| ExecutionSummary {
                dataset_id,
                name,
                outcome: outcome.unwrap_or(Err(DatasetError::NoResultReturned)),
            })
            .collect()
    }

    /// Mark loading, resolve params and gate the query.
    fn prepare(&mut self, id: &str, params: Option<&QueryParams>) -> DatasetResult<PreparedQuery> {
        let Some(dataset) = self.get_dataset(id) else {
            return Err(self.record_error(id, DatasetError::NotFound(id.to_string())));
        };

        let resolved = resolve_params(dataset.parameters.as_deref(), params);
        let template = dataset.sql_query.clone();

        self.loading.insert(id.to_string());
        self.errors.remove(id);

        let gated = resolved
            .map(|resolved| substitute_params(&template, &resolved))
            .and_then(|sql| gate_query(&sql).map_err(DatasetError::from));

        match gated {
            Ok((sql, _report)) => Ok(PreparedQuery {
                dataset_id: id.to_string(),
                sql,
            }),
            Err(e) => {
                self.loading.remove(id);
                Err(self.record_error(id, e))
            }
        }
    }

    /// Cache the result or record the failure, then clear the loading flag.
    fn finish(
        &mut self,
        prepared: PreparedQuery,
        outcome: ExecutorResult<Option<QueryResult>>,
    ) -> DatasetResult<&DatasetCache> {
        let id = prepared.dataset_id;
        self.loading.remove(&id);

        let result = match outcome {
            Ok(Some(result)) => result,
            Ok(None) => return Err(self.record_error(&id, DatasetError::NoResultReturned)),
            Err(e) => return Err(self.record_error(&id, DatasetError::Execution(e.to_string()))),
        };

        let cache = DatasetCache::new(result.rows);

        if let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == id) {
            let undeclared = dataset.fields.as_ref().map_or(true, Vec::is_empty);
            if undeclared && !cache.fields.is_empty() {
                dataset.fields = Some(infer_fields(
                    &cache.fields,
                    cache.rows.first(),
                    &result.columns,
                ));
            }
        }

        info!(
            dataset = %id,
            rows = cache.rows.len(),
            elapsed_ms = result.execution_time_ms,
            "dataset executed"
        );

        self.cache.insert(id.clone(), cache);
        self.cache
            .get(&id)
            .ok_or(DatasetError::NoResultReturned)
    }

    fn record_error(&mut self, id: &str, error: DatasetError) -> DatasetError {
        warn!(dataset = %id, error = %error, "dataset execution failed");
        self.errors.insert(id.to_string(), error.clone());
        error
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Cached rows, or an empty slice if the dataset has no cached result.
    pub fn get_dataset_data(&self, id: &str) -> &[Record] {
        self.cache
            .get(id)
            .map(|c| c.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Cached field names, else declared field names, else empty.
    pub fn get_dataset_fields(&self, id: &str) -> Vec<String> {
        if let Some(cached) = self.cache.get(id).filter(|c| !c.fields.is_empty()) {
            return cached.fields.clone();
        }
        self.get_dataset(id)
            .map(Dataset::field_names)
            .unwrap_or_default()
    }

    pub fn get_dataset_cache(&self, id: &str) -> Option<&DatasetCache> {
        self.cache.get(id)
    }

    pub fn is_dataset_loading(&self, id: &str) -> bool {
        self.loading.contains(id)
    }

    pub fn get_dataset_error(&self, id: &str) -> Option<&DatasetError> {
        self.errors.get(id)
    }
}

/// `ds_<base36 millis>_<4 random base36 chars>`.
fn new_dataset_id() -> String {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("ds_{}_{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}
