//! Option resolution for DTO instances.

use std::sync::Arc;

use braid_core::{ChannelType, Choice};

use crate::dto::DtoRef;
use crate::metadata::{MetadataStore, OptionParam};

/// Fully resolved schema for one DTO field.
#[derive(Clone, Debug)]
pub struct ResolvedOption {
    /// The field's option annotation.
    pub param: OptionParam,
    /// Choice list, when the field is choice-bearing.
    pub choices: Option<Vec<Choice>>,
    /// Channel restrictions, when the field is channel-restricted.
    pub channel_types: Option<Vec<ChannelType>>,
}

/// Resolves a DTO instance's annotated fields into option descriptors.
///
/// Pure lookup, no side effects: fields without option metadata are simply
/// omitted, and a DTO whose type was never annotated resolves to an empty
/// map rather than an error.
pub struct OptionResolver {
    store: Arc<MetadataStore>,
}

impl OptionResolver {
    /// Creates a resolver reading from the given store.
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self { store }
    }

    /// Maps each annotated field of `dto` to its resolved option, in
    /// first-attach order.
    pub fn resolve(&self, dto: &DtoRef) -> Vec<(String, ResolvedOption)> {
        let type_id = dto.key().id();
        self.store
            .option_params(type_id)
            .into_iter()
            .map(|(field, param)| {
                let choices = self.store.choices(type_id, &field);
                let channel_types = self.store.channel_types(type_id, &field);
                (
                    field,
                    ResolvedOption {
                        param,
                        choices,
                        channel_types,
                    },
                )
            })
            .collect()
    }
}
