//! Marketplace scenario: the installed extension is listed with the right metadata.
//!
//! States in registration order: `GetMarketplace`, `OpenMarketplace`,
//! `OpenExtensionPage`, `PerformChecks`, `CloseMarketplace`,
//! `CheckMarketplaceVisibility`. Only the last one ever issues `Next`.

use crate::builder::{BuildError, MachineBuilder};
use crate::config::MachineConfig;
use crate::core::{Dependencies, HandleSlot, Probe, ValueSlot};
use crate::effects::{Directive, Provide, Scenario, StateError, StateFn, StateMachine};
use crate::expect::Expectations;
use crate::scenarios::metadata::ExtensionMetadata;
use crate::scenarios::TRIGGER_WINDOW;
use crate::state_enum;
use crate::ui::{
    ExtensionItem, ExtensionsPanel, ExtensionsSection, Section, SideBarContent, UiError, UiHandle,
    ViewControl,
};
use async_trait::async_trait;
use std::marker::PhantomData;

/// Title of the activity-bar control that shows the extensions view.
pub const EXTENSIONS_VIEW: &str = "Extensions";

state_enum! {
    pub enum MarketplaceState {
        GetMarketplace,
        OpenMarketplace,
        OpenExtensionPage,
        PerformChecks,
        CloseMarketplace,
        CheckMarketplaceVisibility,
    }
}

type SectionOf<E> = <<E as ExtensionsPanel>::Content as SideBarContent>::Extensions;
type ItemOf<E> = <SectionOf<E> as ExtensionsSection>::Item;

pub struct MarketplaceDeps<E: ExtensionsPanel> {
    pub extension: HandleSlot<ItemOf<E>>,
    pub marketplace: HandleSlot<SectionOf<E>>,
    pub metadata: ValueSlot<ExtensionMetadata>,
}

impl<E: ExtensionsPanel> MarketplaceDeps<E> {
    pub fn new(metadata: ExtensionMetadata) -> Self {
        Self {
            extension: HandleSlot::new("extension"),
            marketplace: HandleSlot::new("marketplace"),
            metadata: ValueSlot::new("metadata", metadata),
        }
    }

    pub fn marketplace_slot(&mut self) -> &mut HandleSlot<SectionOf<E>> {
        &mut self.marketplace
    }

    pub fn extension_slot(&mut self) -> &mut HandleSlot<ItemOf<E>> {
        &mut self.extension
    }
}

impl<E: ExtensionsPanel> Dependencies for MarketplaceDeps<E> {
    fn release(&mut self) {
        self.extension.release();
        self.marketplace.release();
    }
}

/// Marker for the marketplace scenario over panel driver `E`.
pub struct Marketplace<E>(PhantomData<fn() -> E>);

impl<E: ExtensionsPanel> Scenario for Marketplace<E> {
    type State = MarketplaceState;
    type Context = ();
    type Deps = MarketplaceDeps<E>;
    type Env = E;
}

type MarketplaceDirective<E> = Result<Directive<Marketplace<E>>, StateError>;

pub struct GetMarketplace;

#[async_trait]
impl<E: ExtensionsPanel> StateFn<Marketplace<E>> for GetMarketplace {
    async fn run(
        &self,
        provide: Provide<'_, Marketplace<E>>,
        _deps: &MarketplaceDeps<E>,
        panel: &E,
    ) -> MarketplaceDirective<E> {
        let content = panel.side_bar_content().await?;
        if !content.is_displayed().await? {
            return Ok(provide.transition(MarketplaceState::OpenMarketplace));
        }

        let section = content
            .sections()
            .await?
            .into_iter()
            .find_map(Section::into_extensions);
        if let Some(section) = section {
            return Ok(provide
                .transition(MarketplaceState::OpenExtensionPage)
                .fill(MarketplaceDeps::marketplace_slot, section));
        }

        if provide.should_trigger(&MarketplaceState::GetMarketplace) {
            return Ok(provide
                .try_again()
                .create_timer(MarketplaceState::GetMarketplace, TRIGGER_WINDOW));
        }
        Ok(provide.transition(MarketplaceState::OpenMarketplace))
    }
}

/// Toggles the extensions view at most once per trigger window of the
/// invoking state, then hands over to `then`.
async fn toggle_extensions<E: ExtensionsPanel>(
    provide: Provide<'_, Marketplace<E>>,
    panel: &E,
    then: MarketplaceState,
) -> MarketplaceDirective<E> {
    let own = *provide.state();
    let Some(control) = panel.view_control(EXTENSIONS_VIEW).await? else {
        return Ok(provide.try_again());
    };
    if !provide.should_trigger(&own) {
        return Ok(provide.try_again());
    }

    control.toggle().await?;
    Ok(provide
        .transition(then)
        .create_timer(own, TRIGGER_WINDOW))
}

pub struct OpenMarketplace;

#[async_trait]
impl<E: ExtensionsPanel> StateFn<Marketplace<E>> for OpenMarketplace {
    async fn run(
        &self,
        provide: Provide<'_, Marketplace<E>>,
        _deps: &MarketplaceDeps<E>,
        panel: &E,
    ) -> MarketplaceDirective<E> {
        toggle_extensions(provide, panel, MarketplaceState::GetMarketplace).await
    }
}

pub struct OpenExtensionPage;

#[async_trait]
impl<E: ExtensionsPanel> StateFn<Marketplace<E>> for OpenExtensionPage {
    async fn run(
        &self,
        provide: Provide<'_, Marketplace<E>>,
        deps: &MarketplaceDeps<E>,
        _panel: &E,
    ) -> MarketplaceDirective<E> {
        let section = deps.marketplace.read()?;
        let filter = format!("@installed {}", deps.metadata.value().display_name);

        let own = MarketplaceState::OpenExtensionPage;
        match deps.marketplace.classify(section.find_item(&filter).await)? {
            Probe::Ready(Some(item)) => Ok(provide
                .transition(MarketplaceState::PerformChecks)
                .fill(MarketplaceDeps::extension_slot, item)
                .clear_timer(own)),
            // Empty results are often transient: keep searching for one
            // window before looking the section up again.
            Probe::Ready(None) if !provide.has_timer(&own) => {
                Ok(provide.try_again().create_timer(own, TRIGGER_WINDOW))
            }
            Probe::Ready(None) if !provide.has_elapsed_timer(&own) => Ok(provide.try_again()),
            Probe::Ready(None) => Ok(provide
                .transition(MarketplaceState::GetMarketplace)
                .clear_timer(own)),
            Probe::Vanished => Ok(provide
                .transition(MarketplaceState::GetMarketplace)
                .clear_timer(own)),
        }
    }
}

struct Listing {
    title: String,
    description: String,
    author: String,
    installed: bool,
}

async fn read_listing<I: ExtensionItem>(item: &I) -> Result<Listing, UiError> {
    Ok(Listing {
        title: item.title().await?,
        description: item.description().await?,
        author: item.author().await?,
        installed: item.is_installed().await?,
    })
}

pub struct PerformChecks;

#[async_trait]
impl<E: ExtensionsPanel> StateFn<Marketplace<E>> for PerformChecks {
    async fn run(
        &self,
        provide: Provide<'_, Marketplace<E>>,
        deps: &MarketplaceDeps<E>,
        _panel: &E,
    ) -> MarketplaceDirective<E> {
        let item = deps.extension.read()?;
        let listing = match deps.extension.classify(read_listing(item).await)? {
            Probe::Ready(listing) => listing,
            Probe::Vanished => return Ok(provide.transition(MarketplaceState::OpenExtensionPage)),
        };

        let expected = deps.metadata.value();
        Expectations::new()
            .equal("title is not correct", listing.title, expected.display_name.as_str())
            .equal(
                "description is incorrect",
                listing.description,
                expected.description.as_str(),
            )
            .equal("author is incorrect", listing.author, expected.author.as_str())
            .is_true("extension is not installed", listing.installed)
            .verify()?;

        Ok(provide.transition(MarketplaceState::CloseMarketplace))
    }
}

pub struct CloseMarketplace;

#[async_trait]
impl<E: ExtensionsPanel> StateFn<Marketplace<E>> for CloseMarketplace {
    async fn run(
        &self,
        provide: Provide<'_, Marketplace<E>>,
        _deps: &MarketplaceDeps<E>,
        panel: &E,
    ) -> MarketplaceDirective<E> {
        toggle_extensions(provide, panel, MarketplaceState::CheckMarketplaceVisibility).await
    }
}

pub struct CheckMarketplaceVisibility;

#[async_trait]
impl<E: ExtensionsPanel> StateFn<Marketplace<E>> for CheckMarketplaceVisibility {
    async fn run(
        &self,
        provide: Provide<'_, Marketplace<E>>,
        deps: &MarketplaceDeps<E>,
        _panel: &E,
    ) -> MarketplaceDirective<E> {
        let section = deps.marketplace.read()?;

        match deps.marketplace.classify(section.is_displayed().await)? {
            Probe::Ready(true) => Ok(provide.transition(MarketplaceState::CloseMarketplace)),
            // Gone already counts as closed.
            Probe::Ready(false) | Probe::Vanished => Ok(provide.next()),
        }
    }
}

pub fn marketplace_scenario_builder<E: ExtensionsPanel>(
    config: MachineConfig,
    metadata: ExtensionMetadata,
) -> MachineBuilder<Marketplace<E>> {
    MachineBuilder::new(config)
        .context(())
        .dependencies(MarketplaceDeps::new(metadata))
        .state(MarketplaceState::GetMarketplace, GetMarketplace)
        .state(MarketplaceState::OpenMarketplace, OpenMarketplace)
        .state(MarketplaceState::OpenExtensionPage, OpenExtensionPage)
        .state(MarketplaceState::PerformChecks, PerformChecks)
        .state(MarketplaceState::CloseMarketplace, CloseMarketplace)
        .state(
            MarketplaceState::CheckMarketplaceVisibility,
            CheckMarketplaceVisibility,
        )
}

pub fn marketplace_scenario<E: ExtensionsPanel>(
    config: MachineConfig,
    metadata: ExtensionMetadata,
) -> Result<StateMachine<Marketplace<E>>, BuildError> {
    marketplace_scenario_builder(config, metadata).build()
}
