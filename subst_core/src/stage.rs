/// Decides whether replacement runs in a given pipeline phase.
///
/// Phase names are opaque labels defined by the host pipeline; the gate
/// only compares them for exact, case-sensitive equality.
#[derive(Debug, Clone, Default)]
pub struct StageGate {
	stage: Option<String>,
}

impl StageGate {
	/// Build a gate from the configured stage restriction. `None` permits
	/// every phase.
	pub fn new(stage: Option<&str>) -> Self {
		Self {
			stage: stage.map(ToString::to_string),
		}
	}

	pub fn permits(&self, phase: &str) -> bool {
		self.stage.as_deref().is_none_or(|stage| stage == phase)
	}
}
