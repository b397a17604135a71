// Analysis pipeline — the decision core of the crate.
//
// A scan flows through three stages: the provider returns a loosely-typed
// assessment, `normalize` coerces it into a complete AnalysisResult, and
// `heuristics` applies deterministic overrides on top of the AI verdict.
// `scanner` wires the stages together.

pub mod heuristics;
pub mod normalize;
pub mod result;
pub mod scanner;
