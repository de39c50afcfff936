#![doc = include_str!("../../../README.md")]

mod category;
mod classify;
mod compose;
mod config;
mod explain;
mod fault;
mod locate;
mod redact;
mod reflect;
pub mod scope;
pub mod similarity;
mod snapshot;
mod stdlib;
mod templates;
pub mod tracer;

pub use crate::{
    category::{CauseCategory, Classification, ParamValue, Params},
    compose::Explanation,
    config::{DEFAULT_MAX_SUGGESTIONS, DEFAULT_MODULE_THRESHOLD, DEFAULT_THRESHOLD, ExplainConfig},
    explain::{Explainer, classify_only, explain},
    fault::{
        CapturedFault, FaultDetail, FaultKind, FrameInfo, Namespace, RuntimeVersion, SourceLocation, VersionRange,
    },
    redact::{HIDDEN, NoRedaction, PatternRedactor, Redactor},
    reflect::{ObjectKind, ProbeError, ProbeFailure, Reflect},
    snapshot::{DetailRecord, FaultRecord, FrameRecord, ObjectSnapshot, RecordError},
    templates::{BuiltinTemplates, DEFAULT_LANG, TemplateStore},
    tracer::{InferenceTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
};
