//! Condensing a ragged observation axis to its minimal width

use log::debug;

use crate::error::{Error, Result};
use crate::trajectory::TrajectorySet;

impl TrajectorySet {
    /// Left-shifts the existing observations of every trajectory and trims the
    /// observation axis to the longest trajectory
    ///
    /// Order within each trajectory is kept. Trajectories without any
    /// observation stay, fully missing.
    pub fn condense_obs(&self) -> Result<TrajectorySet> {
        if self.is_1d() {
            return Err(Error::Shape(
                "condense_obs requires observation-indexed (2D) trajectories".to_string(),
            ));
        }

        let observed = self.observed();
        let picks: Vec<Vec<usize>> = observed
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, present)| **present)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();

        let condensed = self.gather_rows(&picks);
        debug!(
            "Condensed observation axis from {} to {}",
            self.n_observations(),
            condensed.n_observations()
        );

        Ok(condensed)
    }
}
