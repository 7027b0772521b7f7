//! Test doubles for the collaborators commands talk to.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use crate::cli::prompt::Prompter;
use crate::core::RaftersError;
use crate::installer::DependencyInstaller;

/// Records every install batch; optionally fails each one.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    calls: Mutex<Vec<(Vec<String>, bool)>>,
    fail: bool,
}

impl RecordingInstaller {
    /// Installer whose every call fails with a `DependencyInstallError`.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    /// `(packages, dev)` of each call, in order.
    pub fn calls(&self) -> Vec<(Vec<String>, bool)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DependencyInstaller for RecordingInstaller {
    async fn install(&self, _root: &Path, packages: &[String], dev: bool) -> Result<(), RaftersError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((packages.to_vec(), dev));
        }
        if self.fail {
            return Err(RaftersError::DependencyInstallError {
                manager: "npm".to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Answers questions from a fixed script, in order.
///
/// `confirm` reads `y`/`n`, `select` accepts an option name or 1-based
/// index, and an empty answer or an exhausted script keeps the default.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(ToString::to_string).collect(),
        }
    }

    fn next(&mut self) -> Option<String> {
        self.answers.pop_front().filter(|answer| !answer.is_empty())
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _question: &str, default: bool) -> Result<bool> {
        Ok(self.next().map_or(default, |answer| answer.eq_ignore_ascii_case("y")))
    }

    fn input(&mut self, _question: &str, default: &str) -> Result<String> {
        Ok(self.next().unwrap_or_else(|| default.to_string()))
    }

    fn select(&mut self, _question: &str, options: &[String], default: usize) -> Result<usize> {
        let Some(answer) = self.next() else {
            return Ok(default);
        };
        if let Some(index) = options.iter().position(|o| o.eq_ignore_ascii_case(&answer)) {
            return Ok(index);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Ok(n - 1),
            _ => anyhow::bail!("scripted answer '{answer}' is not one of {options:?}"),
        }
    }
}
