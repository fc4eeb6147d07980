//! Unit tests for the task bounded context.

mod support;
