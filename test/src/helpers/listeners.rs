use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use netlist_client::ReceiverListener;
use netlist_server::TransmitterListener;
use netlist_shared::{NetworkObject, NetworkObjectList, ObjectHandle};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Receiver callback, recorded in the order it was made
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    BeginList(String),
    EndList(String),
    Created(ObjectHandle),
    Destroyed(ObjectHandle),
    BeginUpdate(ObjectHandle),
    EndUpdate(ObjectHandle),
}

/// Receiver listener that records every callback into a shared log
#[derive(Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the recorded events
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *lock(&self.events))
    }

    fn record(&self, event: Event) {
        lock(&self.events).push(event);
    }
}

impl ReceiverListener for RecordingListener {
    fn on_begin_process_list(&mut self, list: &NetworkObjectList) {
        self.record(Event::BeginList(list.name().to_string()));
    }

    fn on_end_process_list(&mut self, list: &NetworkObjectList) {
        self.record(Event::EndList(list.name().to_string()));
    }

    fn on_object_created(&mut self, _list: &NetworkObjectList, object: &NetworkObject) {
        self.record(Event::Created(object.handle()));
    }

    fn on_object_destroyed(&mut self, _list: &NetworkObjectList, object: &NetworkObject) {
        self.record(Event::Destroyed(object.handle()));
    }

    fn on_begin_update(&mut self, _list: &NetworkObjectList, object: &NetworkObject) {
        self.record(Event::BeginUpdate(object.handle()));
    }

    fn on_end_update(&mut self, _list: &NetworkObjectList, object: &NetworkObject) {
        self.record(Event::EndUpdate(object.handle()));
    }
}

/// Shared switches for a `FilterListener`
#[derive(Default)]
pub struct FilterState {
    pub paused: bool,
    pub hidden: HashSet<ObjectHandle>,
    pub processed_lists: Vec<String>,
}

/// Transmitter listener that can pause a destination or hide objects from it
#[derive(Clone, Default)]
pub struct FilterListener {
    state: Arc<Mutex<FilterState>>,
}

impl FilterListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_paused(&self, paused: bool) {
        lock(&self.state).paused = paused;
    }

    pub fn hide(&self, handle: ObjectHandle) {
        lock(&self.state).hidden.insert(handle);
    }

    pub fn show(&self, handle: &ObjectHandle) {
        lock(&self.state).hidden.remove(handle);
    }

    /// Names of the lists processed so far, once per begin/end pair
    pub fn processed_lists(&self) -> Vec<String> {
        lock(&self.state).processed_lists.clone()
    }
}

impl TransmitterListener for FilterListener {
    fn can_transmit(&self) -> bool {
        !lock(&self.state).paused
    }

    fn filter(&mut self, _list: &NetworkObjectList, object: &NetworkObject) -> bool {
        !lock(&self.state).hidden.contains(&object.handle())
    }

    fn on_end_process_list(&mut self, list: &NetworkObjectList) {
        lock(&self.state).processed_lists.push(list.name().to_string());
    }
}
