//! Mock implementations of harness seams.
