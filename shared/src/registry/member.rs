use std::{any::Any, fmt, sync::Arc};

use crate::converters::{TypeConverter, Value};

pub(crate) type Getter = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
pub(crate) type Setter = Arc<dyn Fn(&mut dyn Any, &Value) -> bool + Send + Sync>;

/// One networked field of a registered type
#[derive(Clone)]
pub struct Member {
    name: String,
    converter: Arc<dyn TypeConverter>,
    change_notification_index: Option<usize>,
    getter: Getter,
    setter: Setter,
}

impl Member {
    pub(crate) fn new(
        name: String,
        converter: Arc<dyn TypeConverter>,
        getter: Getter,
        setter: Setter,
    ) -> Self {
        Self {
            name,
            converter,
            change_notification_index: None,
            getter,
            setter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn converter(&self) -> &dyn TypeConverter {
        self.converter.as_ref()
    }

    /// Slot in the owning object's change mask, if this member is only
    /// diffed after an explicit change notification
    pub fn change_notification_index(&self) -> Option<usize> {
        self.change_notification_index
    }

    pub(crate) fn set_change_notification_index(&mut self, index: usize) {
        self.change_notification_index = Some(index);
    }

    /// Reads the live field. `None` if `instance` is not the registered type.
    pub(crate) fn get(&self, instance: &dyn Any) -> Option<Value> {
        (self.getter)(instance)
    }

    /// Assigns the live field. `false` if the instance or the value has the wrong type.
    pub(crate) fn set(&self, instance: &mut dyn Any, value: &Value) -> bool {
        (self.setter)(instance, value)
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("converter", &self.converter.name())
            .field("change_notification_index", &self.change_notification_index)
            .finish()
    }
}
