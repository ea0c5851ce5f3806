//! Command-palette scenario: every contributed command must be findable.
//!
//! Graph: `OpenInput → StartCheck → CheckCommand(0) … CheckCommand(n-1) → CloseInput`.
//! The context index counts matched commands, so when the palette closes
//! underneath a check, `OpenInput` reopens it and jumps straight back to the
//! check that was interrupted.

use crate::builder::{BuildError, MachineBuilder};
use crate::config::MachineConfig;
use crate::core::{Context, Dependencies, HandleSlot, Probe, State, ValueSlot};
use crate::effects::{Directive, Provide, Scenario, StateError, StateFn, StateMachine};
use crate::scenarios::metadata::ExtensionMetadata;
use crate::scenarios::TRIGGER_WINDOW;
use crate::ui::{CommandPalette, InputBox, UiError, UiHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::marker::PhantomData;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CommandState {
    OpenInput,
    StartCheck,
    /// Check of the command at this position in the expected list
    CheckCommand(usize),
    CloseInput,
}

impl State for CommandState {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::OpenInput => Cow::Borrowed("OpenInput"),
            Self::StartCheck => Cow::Borrowed("StartCheck"),
            Self::CheckCommand(i) => Cow::Owned(format!("CheckCommand({i})")),
            Self::CloseInput => Cow::Borrowed("CloseInput"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandContext {
    /// Expected command titles
    pub commands: Vec<String>,
    /// Number of commands matched so far
    pub index: usize,
}

impl CommandContext {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands, index: 0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandContextPatch {
    pub commands: Option<Vec<String>>,
    pub index: Option<usize>,
}

impl CommandContextPatch {
    pub fn index(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Default::default()
        }
    }
}

impl Context for CommandContext {
    type Patch = CommandContextPatch;

    fn merge(&mut self, patch: CommandContextPatch) {
        if let Some(commands) = patch.commands {
            self.commands = commands;
        }
        if let Some(index) = patch.index {
            self.index = index;
        }
    }
}

pub struct CommandDeps<I> {
    pub input: HandleSlot<I>,
    pub metadata: ValueSlot<ExtensionMetadata>,
}

impl<I: InputBox> CommandDeps<I> {
    pub fn new(metadata: ExtensionMetadata) -> Self {
        Self {
            input: HandleSlot::new("input"),
            metadata: ValueSlot::new("metadata", metadata),
        }
    }

    pub fn input_slot(&mut self) -> &mut HandleSlot<I> {
        &mut self.input
    }
}

impl<I: InputBox> Dependencies for CommandDeps<I> {
    fn release(&mut self) {
        self.input.release();
    }
}

/// Marker for the command-palette scenario over palette driver `P`.
pub struct Commands<P>(PhantomData<fn() -> P>);

impl<P: CommandPalette> Scenario for Commands<P> {
    type State = CommandState;
    type Context = CommandContext;
    type Deps = CommandDeps<P::Input>;
    type Env = P;
}

type CommandDirective<P> = Result<Directive<Commands<P>>, StateError>;

/// Where `OpenInput` hands over once the input box is up.
pub fn resume_target(context: &CommandContext) -> Result<CommandState, StateError> {
    match context.index {
        0 => Ok(CommandState::StartCheck),
        index if index < context.commands.len() => Ok(CommandState::CheckCommand(index)),
        // Every command matched; only the close is left.
        index if index == context.commands.len() => Ok(CommandState::CloseInput),
        index => Err(StateError::ResumeOutOfRange {
            index,
            len: context.commands.len(),
        }),
    }
}

pub struct OpenInput;

#[async_trait]
impl<P: CommandPalette> StateFn<Commands<P>> for OpenInput {
    async fn run(
        &self,
        provide: Provide<'_, Commands<P>>,
        _deps: &CommandDeps<P::Input>,
        palette: &P,
    ) -> CommandDirective<P> {
        if provide.should_trigger(&CommandState::OpenInput) {
            palette.open_command_prompt().await?;
            return Ok(provide
                .try_again()
                .create_timer(CommandState::OpenInput, TRIGGER_WINDOW));
        }

        let input = palette.input_box().await?;
        if !input.is_displayed().await? {
            return Ok(provide.try_again());
        }

        let target = resume_target(provide.context())?;
        Ok(provide
            .transition(target)
            .fill(CommandDeps::input_slot, input)
            .clear_timer(CommandState::OpenInput))
    }
}

pub struct StartCheck;

#[async_trait]
impl<P: CommandPalette> StateFn<Commands<P>> for StartCheck {
    async fn run(
        &self,
        provide: Provide<'_, Commands<P>>,
        _deps: &CommandDeps<P::Input>,
        _palette: &P,
    ) -> CommandDirective<P> {
        Ok(provide.next())
    }
}

/// Checks that one command title shows up as a palette suggestion.
pub struct CheckCommand {
    position: usize,
    title: String,
}

impl CheckCommand {
    pub fn new(position: usize, title: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
        }
    }

    /// Position of this check in the expected command list.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

enum Lookup {
    Hidden,
    Pending,
    Matched,
}

async fn filter_and_match<I: InputBox>(input: &I, title: &str) -> Result<Lookup, UiError> {
    if !input.is_displayed().await? {
        return Ok(Lookup::Hidden);
    }

    let filter = format!(">{title}");
    if input.text().await? != filter {
        input.set_text(&filter).await?;
    }

    let pick = input.find_quick_pick(title).await?;
    if pick.as_deref() == Some(title) {
        Ok(Lookup::Matched)
    } else {
        Ok(Lookup::Pending)
    }
}

#[async_trait]
impl<P: CommandPalette> StateFn<Commands<P>> for CheckCommand {
    async fn run(
        &self,
        provide: Provide<'_, Commands<P>>,
        deps: &CommandDeps<P::Input>,
        _palette: &P,
    ) -> CommandDirective<P> {
        let input = deps.input.read()?;

        match deps.input.classify(filter_and_match(input, &self.title).await)? {
            Probe::Vanished | Probe::Ready(Lookup::Hidden) => {
                Ok(provide.transition(CommandState::OpenInput))
            }
            Probe::Ready(Lookup::Pending) => Ok(provide.try_again()),
            Probe::Ready(Lookup::Matched) => Ok(provide
                .next()
                .update_context(CommandContextPatch::index(self.position + 1))),
        }
    }
}

pub struct CloseInput;

async fn dismiss<I: InputBox>(input: &I) -> Result<bool, UiError> {
    if input.is_displayed().await? {
        input.cancel().await?;
        return Ok(true);
    }
    Ok(false)
}

#[async_trait]
impl<P: CommandPalette> StateFn<Commands<P>> for CloseInput {
    async fn run(
        &self,
        provide: Provide<'_, Commands<P>>,
        deps: &CommandDeps<P::Input>,
        _palette: &P,
    ) -> CommandDirective<P> {
        let input = deps.input.read()?;

        match deps.input.classify(dismiss(input).await)? {
            // Cancelled just now; confirm on the next round.
            Probe::Ready(true) => Ok(provide.try_again()),
            Probe::Ready(false) | Probe::Vanished => Ok(provide.next()),
        }
    }
}

/// Builder with the full command graph registered, one check per command.
///
/// Callers may still swap the clock or the initial context before building.
pub fn command_scenario_builder<P: CommandPalette>(
    config: MachineConfig,
    metadata: ExtensionMetadata,
) -> MachineBuilder<Commands<P>> {
    let checks: Vec<_> = metadata
        .commands
        .iter()
        .enumerate()
        .map(|(i, title)| (CommandState::CheckCommand(i), CheckCommand::new(i, title.clone())))
        .collect();

    MachineBuilder::new(config)
        .context(CommandContext::new(metadata.commands.clone()))
        .dependencies(CommandDeps::new(metadata))
        .state(CommandState::OpenInput, OpenInput)
        .state(CommandState::StartCheck, StartCheck)
        .states(checks)
        .state(CommandState::CloseInput, CloseInput)
}

pub fn command_scenario<P: CommandPalette>(
    config: MachineConfig,
    metadata: ExtensionMetadata,
) -> Result<StateMachine<Commands<P>>, BuildError> {
    command_scenario_builder(config, metadata).build()
}
