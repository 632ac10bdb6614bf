/// One row of the activity log: a frame's dissimilarity score and whether it
/// fell below the inactivity threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityRecord {
    pub frame_index: usize,
    pub score: f64,
    pub inactive: bool,
}
