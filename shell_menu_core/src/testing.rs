//! In-memory stand-ins for the native menu, the shell's context-menu object and its container.

use std::cell::RefCell;
use std::collections::HashMap;

#[cfg(feature = "popup")]
use dpi::PhysicalPosition;

#[cfg(feature = "popup")]
use crate::bridge::PopupHost;
use crate::command::{CommandId, Ordinal};
use crate::error::{Error, Result};
use crate::handler::{
    CommandStringKind, ContextMenuHandler, InvokeRequest, InvokeTarget, MessageCapability,
    QueryRequest,
};
use crate::menu::{MenuEntryInfo, NativeMenu};
use crate::message::WindowMessage;
use crate::selection::{ParentContainer, Selection, SelectionItem};

const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;

#[derive(Debug, Clone)]
struct FakeEntry {
    id: u32,
    label: String,
    submenu: Option<usize>,
}

/// A flat menu whose submenus are plain integers.
#[derive(Debug, Default)]
pub struct FakeMenu {
    entries: Vec<FakeEntry>,
    tags: HashMap<usize, usize>,
    application_submenus: Vec<usize>,
    next_submenu: usize,
}

impl FakeMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_item(&mut self, id: u32, label: &str) {
        self.entries.push(FakeEntry {
            id,
            label: label.to_string(),
            submenu: None,
        });
    }

    /// Append a submenu the way the application would, returning its handle.
    pub fn append_submenu(&mut self, label: &str) -> usize {
        let submenu = self.new_submenu();
        self.application_submenus.push(submenu);
        self.entries.push(FakeEntry {
            id: 0,
            label: label.to_string(),
            submenu: Some(submenu),
        });
        submenu
    }

    /// Attach a submenu without recording it, as a host building its menu natively would.
    pub fn attach_submenu(&mut self, label: &str) -> usize {
        let submenu = self.new_submenu();
        self.entries.push(FakeEntry {
            id: 0,
            label: label.to_string(),
            submenu: Some(submenu),
        });
        submenu
    }

    /// Record every submenu currently attached as the application's.
    pub fn adopt_existing_submenus(&mut self) {
        let existing: Vec<usize> = self.entries.iter().filter_map(|entry| entry.submenu).collect();
        for submenu in existing {
            if !self.application_submenus.contains(&submenu) {
                self.application_submenus.push(submenu);
            }
        }
    }

    pub fn insert_shell_item(&mut self, position: usize, id: u32, label: &str) {
        self.entries.insert(
            position,
            FakeEntry {
                id,
                label: label.to_string(),
                submenu: None,
            },
        );
    }

    pub fn insert_shell_submenu(&mut self, position: usize, id: u32, label: &str) -> usize {
        let submenu = self.new_submenu();
        self.entries.insert(
            position,
            FakeEntry {
                id,
                label: label.to_string(),
                submenu: Some(submenu),
            },
        );
        submenu
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.label.clone()).collect()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    fn new_submenu(&mut self) -> usize {
        self.next_submenu += 1;
        self.next_submenu
    }
}

impl NativeMenu for FakeMenu {
    type Submenu = usize;

    fn entry_count(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    fn entry(&self, position: usize) -> Result<MenuEntryInfo<usize>> {
        let entry = self
            .entries
            .get(position)
            .ok_or_else(|| Error::native("entry", E_INVALIDARG, "position out of range"))?;
        Ok(MenuEntryInfo {
            id: entry.id,
            submenu: entry.submenu,
        })
    }

    fn application_submenus(&self) -> Vec<usize> {
        self.application_submenus.clone()
    }

    fn submenu_tag(&self, submenu: usize) -> Result<usize> {
        Ok(self.tags.get(&submenu).copied().unwrap_or(0))
    }

    fn set_submenu_tag(&mut self, submenu: usize, tag: usize) -> Result<()> {
        self.tags.insert(submenu, tag);
        Ok(())
    }

    fn remove_entry(&mut self, position: usize) -> Result<()> {
        if position >= self.entries.len() {
            return Err(Error::native("remove_entry", E_INVALIDARG, "position out of range"));
        }
        let entry = self.entries.remove(position);
        if let Some(submenu) = entry.submenu {
            self.tags.remove(&submenu);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct FakeCommand {
    label: &'static str,
    submenu: bool,
}

/// A context-menu object that records every call made to it.
#[derive(Debug, Clone)]
pub struct FakeHandler {
    capability: MessageCapability,
    commands: Vec<FakeCommand>,
    invoke_failure: Option<i32>,
    forward: std::result::Result<isize, i32>,
    queries: RefCell<Vec<QueryRequest>>,
    invocations: RefCell<Vec<InvokeRequest>>,
    forwarded: RefCell<Vec<(MessageCapability, WindowMessage)>>,
}

impl FakeHandler {
    pub fn new(capability: MessageCapability) -> Self {
        Self {
            capability,
            commands: Vec::new(),
            invoke_failure: None,
            forward: Ok(0),
            queries: RefCell::default(),
            invocations: RefCell::default(),
            forwarded: RefCell::default(),
        }
    }

    pub fn with_commands(mut self, labels: impl IntoIterator<Item = &'static str>) -> Self {
        self.commands
            .extend(labels.into_iter().map(|label| FakeCommand { label, submenu: false }));
        self
    }

    pub fn with_submenu(mut self, label: &'static str) -> Self {
        self.commands.push(FakeCommand { label, submenu: true });
        self
    }

    pub fn failing_invoke(mut self, code: i32) -> Self {
        self.invoke_failure = Some(code);
        self
    }

    pub fn with_forward_result(mut self, result: isize) -> Self {
        self.forward = Ok(result);
        self
    }

    pub fn failing_forward(mut self, code: i32) -> Self {
        self.forward = Err(code);
        self
    }

    pub fn queries(&self) -> Vec<QueryRequest> {
        self.queries.borrow().clone()
    }

    pub fn invocations(&self) -> Vec<InvokeRequest> {
        self.invocations.borrow().clone()
    }

    pub fn invoked_verbs(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .filter_map(|request| match &request.target {
                InvokeTarget::Verb(verb) => Some(verb.to_string()),
                InvokeTarget::Command { .. } => None,
            })
            .collect()
    }

    pub fn invoked_commands(&self) -> Vec<(Ordinal, CommandId)> {
        self.invocations
            .borrow()
            .iter()
            .filter_map(|request| match request.target {
                InvokeTarget::Command {
                    ordinal,
                    command_id,
                } => Some((ordinal, command_id)),
                InvokeTarget::Verb(_) => None,
            })
            .collect()
    }

    pub fn forwarded(&self) -> Vec<(MessageCapability, WindowMessage)> {
        self.forwarded.borrow().clone()
    }

    fn record_forward(&self, level: MessageCapability, message: &WindowMessage) -> Result<isize> {
        if self.capability < level {
            return Err(Error::Unsupported("menu message handling"));
        }
        self.forwarded.borrow_mut().push((level, *message));
        self.forward
            .map_err(|code| Error::native("HandleMenuMsg", code, "forwarding failed"))
    }
}

impl ContextMenuHandler for FakeHandler {
    type Menu = FakeMenu;

    fn capability(&self) -> MessageCapability {
        self.capability
    }

    fn query_context_menu(&self, menu: &mut FakeMenu, request: &QueryRequest) -> Result<u32> {
        self.queries.borrow_mut().push(*request);

        let mut used = 0;
        for (k, command) in self.commands.iter().enumerate() {
            let id = request.first.first() + k as u32;
            if id > request.last_command_id {
                break;
            }
            let position = request.index as usize + k;
            if command.submenu {
                menu.insert_shell_submenu(position, id, command.label);
            } else {
                menu.insert_shell_item(position, id, command.label);
            }
            used += 1;
        }
        Ok(used)
    }

    fn invoke(&self, request: &InvokeRequest) -> Result<()> {
        self.invocations.borrow_mut().push(request.clone());
        match self.invoke_failure {
            Some(code) => Err(Error::native("InvokeCommand", code, "invoke failed")),
            None => Ok(()),
        }
    }

    fn handle_menu_msg(&self, message: &WindowMessage) -> Result<()> {
        self.record_forward(MessageCapability::Basic, message).map(|_| ())
    }

    fn handle_menu_msg2(&self, message: &WindowMessage) -> Result<isize> {
        self.record_forward(MessageCapability::Extended, message)
    }

    fn command_string(&self, ordinal: Ordinal, kind: CommandStringKind) -> Result<Option<String>> {
        let Some(command) = self.commands.get(ordinal.into_raw() as usize) else {
            return Ok(None);
        };
        Ok(Some(match kind {
            CommandStringKind::Verb => command.label.to_ascii_lowercase(),
            CommandStringKind::HelpText => format!("{} the selected items", command.label),
        }))
    }
}

/// A selectable item named by its parent and its own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeItem {
    pub parent: &'static str,
    pub name: &'static str,
}

impl FakeItem {
    pub fn new(parent: &'static str, name: &'static str) -> Self {
        Self { parent, name }
    }
}

impl SelectionItem for FakeItem {
    type ParentKey = &'static str;

    fn parent_key(&self) -> &'static str {
        self.parent
    }
}

/// Hands out clones of one handler and remembers which items it was asked about.
#[derive(Debug)]
pub struct FakeContainer {
    handler: FakeHandler,
    requested: RefCell<Vec<Vec<&'static str>>>,
}

impl FakeContainer {
    pub fn new(handler: FakeHandler) -> Self {
        Self {
            handler,
            requested: RefCell::default(),
        }
    }

    pub fn requested(&self) -> Vec<Vec<&'static str>> {
        self.requested.borrow().clone()
    }
}

impl ParentContainer<FakeItem> for FakeContainer {
    type Handler = FakeHandler;

    fn context_menu_for(&self, selection: &Selection<FakeItem>) -> Result<FakeHandler> {
        self.requested
            .borrow_mut()
            .push(selection.iter().map(|item| item.name).collect());
        Ok(self.handler.clone())
    }
}

/// A popup host that "selects" a fixed identifier.
#[cfg(feature = "popup")]
#[derive(Debug)]
pub struct FakePopupHost {
    selection: Option<u32>,
    tracked_labels: RefCell<Vec<Vec<String>>>,
    tracked_positions: RefCell<Vec<PhysicalPosition<i32>>>,
}

#[cfg(feature = "popup")]
impl FakePopupHost {
    pub fn selecting(selection: Option<u32>) -> Self {
        Self {
            selection,
            tracked_labels: RefCell::default(),
            tracked_positions: RefCell::default(),
        }
    }

    pub fn tracked_labels(&self) -> Vec<Vec<String>> {
        self.tracked_labels.borrow().clone()
    }

    pub fn tracked_positions(&self) -> Vec<PhysicalPosition<i32>> {
        self.tracked_positions.borrow().clone()
    }
}

#[cfg(feature = "popup")]
impl PopupHost for FakePopupHost {
    type Menu = FakeMenu;
    type Anchor = ();

    fn create_popup(&self) -> Result<FakeMenu> {
        Ok(FakeMenu::new())
    }

    fn track_popup(
        &self,
        menu: &FakeMenu,
        _anchor: &(),
        position: PhysicalPosition<i32>,
    ) -> Result<Option<CommandId>> {
        self.tracked_labels.borrow_mut().push(menu.labels());
        self.tracked_positions.borrow_mut().push(position);
        Ok(self.selection.map(CommandId::from_raw))
    }
}
