use crate::memory::*;

/// Enum with possible abort strategies.
/// These strategies specify whether a running k-means calculation may stop before its iteration
/// budget is exhausted. Stopping early changes the result for some inputs, so it is opt-in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AbortStrategy<T: Primitive> {
	/// Always run the full amount of iterations.
	#[default]
	Never,
	/// Abort directly after an iteration produced exactly the same cluster assignments as the one before.
	AssignmentsStable,
	/// Abort directly after an iteration produced no improvement where `improvement > threshold`
	/// for the first time.
	/// ## Fields:
	/// - **threshold**: Threshold, used to detect an improvement of the distance sum (`improvement > threshold`)
	NoImprovement { threshold: T },
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::Never => Box::new(NeverLogic),
			AbortStrategy::AssignmentsStable => Box::new(AssignmentsStableLogic),
			AbortStrategy::NoImprovement{threshold} => Box::new(NoImprovementLogic {
				threshold,
				prev_error: T::infinity()
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Function that has to be called once an iteration of the calculation ended.
	/// ## Arguments
	/// - **error**: The new error (distsum), after an iteration
	/// - **reassigned**: Amount of samples that changed their cluster in this iteration, or **None** for
	/// the first iteration (there is nothing to compare against)
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation should abort
	fn next(&mut self, error: T, reassigned: Option<usize>) -> bool;
}


pub(crate) struct NeverLogic;
impl<T: Primitive> AbortStrategyLogic<T> for NeverLogic {
	fn next(&mut self, _error: T, _reassigned: Option<usize>) -> bool { true }
}


pub(crate) struct AssignmentsStableLogic;
impl<T: Primitive> AbortStrategyLogic<T> for AssignmentsStableLogic {
	fn next(&mut self, _error: T, reassigned: Option<usize>) -> bool {
		reassigned != Some(0)
	}
}


pub(crate) struct NoImprovementLogic<T: Primitive> {
	threshold: T,
	prev_error: T
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementLogic<T> {
	fn next(&mut self, error: T, _reassigned: Option<usize>) -> bool {
		let improvement = self.prev_error - error;
		self.prev_error = error;
		improvement > self.threshold
	}
}
