//! Great-circle (straight line) matrices.

use std::time::Instant;

use rc_core::ProcessingContext;

use crate::config::{GreatCircleConfig, OutputConfig};
use crate::matrix::CostMatrix;
use crate::points::PointSet;

/// Fill a matrix with haversine distances times `distance_multiplier`, and
/// times derived from `speed_mps`.
///
/// Cancellation is polled before each row; a cancelled run returns `None`
/// and leaves nothing behind.
pub fn great_circle_matrix(
    gc:     &GreatCircleConfig,
    output: &OutputConfig,
    points: &PointSet,
    ctx:    &dyn ProcessingContext,
) -> Option<CostMatrix> {
    let n = points.len();
    ctx.post_status(&format!(
        "Calculating {n}x{n} matrix using great circle distance (i.e. straight line)"
    ));

    let started = Instant::now();
    let positions = points.positions();
    let mut matrix = CostMatrix::zeroed(points.ids());

    for (i, &from) in positions.iter().enumerate() {
        if ctx.is_cancelled() {
            tracing::debug!(row = i, "great-circle matrix cancelled");
            return None;
        }
        for (j, &to) in positions.iter().enumerate() {
            let distance_m = from.distance_m(to) * gc.distance_multiplier;
            let time_s = distance_m / gc.speed_mps;
            matrix.set(i, j, output.process(distance_m, time_s));
        }
    }

    tracing::info!(
        points = n,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "great-circle matrix calculated"
    );
    Some(matrix)
}
