//! Property tests for tracker invariants

mod frame_clearing;
