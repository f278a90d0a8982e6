pub mod command;
pub mod format;

pub use command::{
    Channel, CompassOutput, GaugeOutput, OutputId, RenderCommand, TextOutput, Track,
};
pub use format::{NumberFormat, PLACEHOLDER};

use std::collections::HashSet;

/// Receives render commands from the dashboard.
///
/// A renderer that lacks a sink for an output returns `false` from
/// [`has_output`](Renderer::has_output); commands for it are skipped.
pub trait Renderer {
    fn has_output(&self, _output: OutputId) -> bool {
        true
    }

    fn render(&mut self, command: RenderCommand);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn has_output(&self, output: OutputId) -> bool {
        (**self).has_output(output)
    }

    fn render(&mut self, command: RenderCommand) {
        (**self).render(command)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn has_output(&self, output: OutputId) -> bool {
        (**self).has_output(output)
    }

    fn render(&mut self, command: RenderCommand) {
        (**self).render(command)
    }
}

/// Keeps every command it receives. Used by replays and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    missing: HashSet<OutputId>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretends `output` does not exist.
    pub fn without(mut self, output: OutputId) -> Self {
        self.missing.insert(output);
        self
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Most recent text written to `output`.
    pub fn last_text(&self, output: TextOutput) -> Option<&str> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            RenderCommand::Text { output: o, text, .. } if *o == output => Some(text.as_str()),
            _ => None,
        })
    }

    /// Most recent numeric value written to `output`.
    pub fn last_text_value(&self, output: TextOutput) -> Option<f64> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            RenderCommand::Text { output: o, value, .. } if *o == output => Some(*value),
            _ => None,
        })
    }

    pub fn count(&self, kind: &str) -> usize {
        self.commands.iter().filter(|cmd| cmd.kind() == kind).count()
    }
}

impl Renderer for RecordingRenderer {
    fn has_output(&self, output: OutputId) -> bool {
        !self.missing.contains(&output)
    }

    fn render(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}
