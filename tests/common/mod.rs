//! Simulated UI drivers for scenario tests.
//!
//! Each driver keeps its whole UI in one shared record so a test can script
//! delays, count interactions and pull elements out from under a held handle.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use vigil::ui::{
    CommandPalette, ExtensionItem, ExtensionsPanel, ExtensionsSection, HandleId, InputBox,
    Section, SideBarContent, UiError, UiHandle, ViewControl,
};
use vigil::ExtensionMetadata;

pub fn metadata(author: &str) -> ExtensionMetadata {
    ExtensionMetadata::new(
        "JBang",
        "JBang support for Visual Studio Code",
        author,
        vec!["Foo: Run".to_string(), "Foo: Stop".to_string()],
    )
}

fn lock<T>(shared: &Arc<Mutex<T>>) -> MutexGuard<'_, T> {
    shared.lock().unwrap()
}

// ---------------------------------------------------------------------------
// Command palette
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PaletteUi {
    pub open: bool,
    /// `is_displayed` calls that still report hidden after opening
    pub hidden_polls: usize,
    pub text: String,
    /// Lookups per title that come back empty before the pick shows up
    pub misses: HashMap<String, usize>,
    pub input_id: HandleId,
    pub stale: Vec<HandleId>,
    /// Staleness of an element no slot holds
    pub foreign_stale: Option<HandleId>,
    pub prompt_opens: usize,
    pub cancels: usize,
    pub text_sets: usize,
}

#[derive(Clone, Default)]
pub struct MockPalette {
    pub ui: Arc<Mutex<PaletteUi>>,
}

impl MockPalette {
    pub fn new(hidden_polls: usize) -> Self {
        let palette = Self::default();
        palette.state().hidden_polls = hidden_polls;
        palette
    }

    pub fn miss(self, title: &str, times: usize) -> Self {
        self.state().misses.insert(title.to_string(), times);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, PaletteUi> {
        lock(&self.ui)
    }

    /// Close the palette and invalidate the current input handle.
    pub fn drop_input(&self) {
        let mut ui = self.state();
        let old = ui.input_id;
        ui.stale.push(old);
        ui.input_id = HandleId::new();
        ui.open = false;
        ui.text.clear();
    }

    pub fn current_input(&self) -> MockInput {
        MockInput {
            id: self.state().input_id,
            ui: Arc::clone(&self.ui),
        }
    }
}

#[derive(Clone)]
pub struct MockInput {
    pub id: HandleId,
    ui: Arc<Mutex<PaletteUi>>,
}

impl MockInput {
    fn live(&self) -> Result<MutexGuard<'_, PaletteUi>, UiError> {
        let ui = lock(&self.ui);
        if ui.stale.contains(&self.id) {
            return Err(UiError::Stale { handle: self.id });
        }
        if let Some(handle) = ui.foreign_stale {
            return Err(UiError::Stale { handle });
        }
        Ok(ui)
    }
}

#[async_trait]
impl UiHandle for MockInput {
    fn handle_id(&self) -> HandleId {
        self.id
    }

    async fn is_displayed(&self) -> Result<bool, UiError> {
        let mut ui = self.live()?;
        if !ui.open {
            return Ok(false);
        }
        if ui.hidden_polls > 0 {
            ui.hidden_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }
}

#[async_trait]
impl InputBox for MockInput {
    async fn text(&self) -> Result<String, UiError> {
        Ok(self.live()?.text.clone())
    }

    async fn set_text(&self, text: &str) -> Result<(), UiError> {
        let mut ui = self.live()?;
        ui.text = text.to_string();
        ui.text_sets += 1;
        Ok(())
    }

    async fn find_quick_pick(&self, label: &str) -> Result<Option<String>, UiError> {
        let mut ui = self.live()?;
        if let Some(remaining) = ui.misses.get_mut(label) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None);
            }
        }
        if ui.text == format!(">{label}") {
            Ok(Some(label.to_string()))
        } else {
            Ok(None)
        }
    }

    async fn cancel(&self) -> Result<(), UiError> {
        let mut ui = self.live()?;
        ui.open = false;
        ui.text.clear();
        ui.cancels += 1;
        Ok(())
    }
}

#[async_trait]
impl CommandPalette for MockPalette {
    type Input = MockInput;

    async fn open_command_prompt(&self) -> Result<(), UiError> {
        let mut ui = self.state();
        ui.open = true;
        ui.prompt_opens += 1;
        Ok(())
    }

    async fn input_box(&self) -> Result<MockInput, UiError> {
        Ok(self.current_input())
    }
}

// ---------------------------------------------------------------------------
// Extensions panel
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Listing {
    pub title: String,
    pub description: String,
    pub author: String,
    pub installed: bool,
}

#[derive(Debug)]
pub struct PanelUi {
    pub visible: bool,
    /// `sections()` calls made while visible
    pub section_calls: usize,
    /// The extensions section is listed from this call on
    pub section_from_call: usize,
    pub section_id: HandleId,
    pub item_id: HandleId,
    pub listing: Listing,
    pub item_stale: bool,
    pub toggles: usize,
    pub searches: Vec<String>,
}

#[derive(Clone)]
pub struct MockPanel {
    pub ui: Arc<Mutex<PanelUi>>,
}

impl MockPanel {
    pub fn new(visible: bool, section_from_call: usize, listing: Listing) -> Self {
        Self {
            ui: Arc::new(Mutex::new(PanelUi {
                visible,
                section_calls: 0,
                section_from_call,
                section_id: HandleId::new(),
                item_id: HandleId::new(),
                listing,
                item_stale: false,
                toggles: 0,
                searches: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, PanelUi> {
        lock(&self.ui)
    }

    pub fn section(&self) -> MockSection {
        MockSection {
            id: self.state().section_id,
            ui: Arc::clone(&self.ui),
        }
    }

    pub fn item(&self) -> MockItem {
        MockItem {
            id: self.state().item_id,
            ui: Arc::clone(&self.ui),
        }
    }
}

pub fn listing_for(metadata: &ExtensionMetadata, author: &str) -> Listing {
    Listing {
        title: metadata.display_name.clone(),
        description: metadata.description.clone(),
        author: author.to_string(),
        installed: true,
    }
}

pub struct MockContent {
    id: HandleId,
    ui: Arc<Mutex<PanelUi>>,
}

#[async_trait]
impl UiHandle for MockContent {
    fn handle_id(&self) -> HandleId {
        self.id
    }

    async fn is_displayed(&self) -> Result<bool, UiError> {
        Ok(lock(&self.ui).visible)
    }
}

#[async_trait]
impl SideBarContent for MockContent {
    type Extensions = MockSection;

    async fn sections(&self) -> Result<Vec<Section<MockSection>>, UiError> {
        let mut ui = lock(&self.ui);
        if !ui.visible {
            return Ok(Vec::new());
        }
        ui.section_calls += 1;

        let mut sections = vec![Section::Other {
            title: "Explorer".to_string(),
        }];
        if ui.section_calls >= ui.section_from_call {
            sections.push(Section::Extensions(MockSection {
                id: ui.section_id,
                ui: Arc::clone(&self.ui),
            }));
        }
        Ok(sections)
    }
}

#[derive(Clone)]
pub struct MockSection {
    pub id: HandleId,
    ui: Arc<Mutex<PanelUi>>,
}

impl MockSection {
    fn live(&self) -> Result<MutexGuard<'_, PanelUi>, UiError> {
        let ui = lock(&self.ui);
        if !ui.visible || ui.section_id != self.id {
            return Err(UiError::Stale { handle: self.id });
        }
        Ok(ui)
    }
}

#[async_trait]
impl UiHandle for MockSection {
    fn handle_id(&self) -> HandleId {
        self.id
    }

    async fn is_displayed(&self) -> Result<bool, UiError> {
        self.live().map(|_| true)
    }
}

#[async_trait]
impl ExtensionsSection for MockSection {
    type Item = MockItem;

    async fn find_item(&self, filter: &str) -> Result<Option<MockItem>, UiError> {
        let mut ui = self.live()?;
        ui.searches.push(filter.to_string());
        if filter == format!("@installed {}", ui.listing.title) {
            Ok(Some(MockItem {
                id: ui.item_id,
                ui: Arc::clone(&self.ui),
            }))
        } else {
            Ok(None)
        }
    }
}

#[derive(Clone)]
pub struct MockItem {
    pub id: HandleId,
    ui: Arc<Mutex<PanelUi>>,
}

impl MockItem {
    fn listing(&self) -> Result<Listing, UiError> {
        let ui = lock(&self.ui);
        if ui.item_stale || ui.item_id != self.id {
            return Err(UiError::Stale { handle: self.id });
        }
        Ok(ui.listing.clone())
    }
}

#[async_trait]
impl UiHandle for MockItem {
    fn handle_id(&self) -> HandleId {
        self.id
    }

    async fn is_displayed(&self) -> Result<bool, UiError> {
        self.listing().map(|_| true)
    }
}

#[async_trait]
impl ExtensionItem for MockItem {
    async fn title(&self) -> Result<String, UiError> {
        Ok(self.listing()?.title)
    }

    async fn description(&self) -> Result<String, UiError> {
        Ok(self.listing()?.description)
    }

    async fn author(&self) -> Result<String, UiError> {
        Ok(self.listing()?.author)
    }

    async fn is_installed(&self) -> Result<bool, UiError> {
        Ok(self.listing()?.installed)
    }
}

pub struct MockControl {
    ui: Arc<Mutex<PanelUi>>,
}

#[async_trait]
impl ViewControl for MockControl {
    async fn toggle(&self) -> Result<(), UiError> {
        let mut ui = lock(&self.ui);
        ui.visible = !ui.visible;
        ui.toggles += 1;
        if ui.visible {
            // Reopening renders a fresh section element.
            ui.section_id = HandleId::new();
        }
        Ok(())
    }
}

#[async_trait]
impl ExtensionsPanel for MockPanel {
    type Content = MockContent;
    type Control = MockControl;

    async fn side_bar_content(&self) -> Result<MockContent, UiError> {
        Ok(MockContent {
            id: HandleId::new(),
            ui: Arc::clone(&self.ui),
        })
    }

    async fn view_control(&self, title: &str) -> Result<Option<MockControl>, UiError> {
        if title != "Extensions" {
            return Ok(None);
        }
        Ok(Some(MockControl {
            ui: Arc::clone(&self.ui),
        }))
    }
}
