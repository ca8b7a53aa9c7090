//! Run template and submission definitions
//!
//! These are the resource payloads handed to the control plane when
//! submitting work: a reusable `RunTemplate` (what to execute) and a
//! `RunSubmission` (one run of a template).

use serde::{Deserialize, Serialize};

/// One step of a run template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStep {
    /// Step name
    pub name: String,
    /// Container image the step runs in
    pub image: String,
    /// Script executed inside the image
    pub script: String,
}

/// Reusable definition of a unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTemplate {
    /// Template name, unique within a namespace
    pub name: String,
    /// Ordered steps to execute
    pub steps: Vec<TemplateStep>,
}

impl RunTemplate {
    /// The built-in hello-world template
    pub fn hello_world() -> Self {
        Self {
            name: crate::defaults::DEFAULT_TEMPLATE_NAME.to_string(),
            steps: vec![TemplateStep {
                name: "hello-world".to_string(),
                image: "busybox".to_string(),
                script: "echo 'Hello World'".to_string(),
            }],
        }
    }
}

/// Request to execute one run of a template
///
/// Exactly one of `name` and `generate_name` should be set; with
/// `generate_name` the control plane appends a unique suffix and the
/// assigned name comes back on the created `RunState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSubmission {
    /// Caller-specified run name
    pub name: Option<String>,
    /// Prefix for a server-generated run name
    pub generate_name: Option<String>,
    /// Name of the template to execute
    pub template: String,
}

impl RunSubmission {
    /// Submission with a server-generated name from the given prefix
    pub fn generated(prefix: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: None,
            generate_name: Some(prefix.into()),
            template: template.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_template() {
        let template = RunTemplate::hello_world();
        assert_eq!(template.name, "hello-world");
        assert_eq!(template.steps.len(), 1);
        assert_eq!(template.steps[0].image, "busybox");
    }

    #[test]
    fn test_generated_submission() {
        let submission = RunSubmission::generated("hello-world-run-", "hello-world");
        assert!(submission.name.is_none());
        assert_eq!(submission.generate_name.as_deref(), Some("hello-world-run-"));
        assert_eq!(submission.template, "hello-world");
    }
}
