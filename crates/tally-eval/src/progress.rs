//! Live progress read path

use serde::Serialize;
use tally_core::TallyResult;
use tally_core::types::{Run, RunId};
use tally_store::{PageRequest, ResultPage, StoreHandles};

/// A run and one page of the results persisted so far
#[derive(Debug, Clone, Serialize)]
pub struct RunProgress {
    pub run: Run,
    pub page: ResultPage,
}

impl RunProgress {
    pub async fn load(
        stores: &StoreHandles,
        run_id: RunId,
        page: PageRequest,
    ) -> TallyResult<Self> {
        let run = stores.runs.get_run(run_id).await?;
        let page = stores.result_log.page(run_id, page).await?;
        Ok(Self { run, page })
    }

    /// Results persisted when the page was read
    pub fn persisted(&self) -> usize {
        self.page.total
    }

    /// Share of samples with a persisted result, once the dataset is loaded
    pub fn fraction_done(&self) -> Option<f64> {
        (self.run.total_samples > 0)
            .then(|| (self.persisted() as f64 / self.run.total_samples as f64).min(1.0))
    }
}
