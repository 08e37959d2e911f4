//! Form builder
//!
//! Turns group descriptors into a runtime form with one bound value slot per
//! field. The builder keeps only a reference to the descriptors, so the same
//! schema can be instantiated any number of times (once per reviewer); each
//! instance gets its own value store.

use tracing::debug;

use crate::error::ConfigurationError;
use crate::schema::{FieldDescriptor, FieldType, GroupDescriptor};

use super::field::{normalize_extension, require_yes, required, required_rating, FieldKind, RuntimeField};
use super::runtime::{RuntimeForm, RuntimeGroup};
use super::store::ValueStore;

const DEFAULT_AFFIRMATIVE: &str = "Yes";
const DEFAULT_NEGATIVE: &str = "No";

/// Instantiates runtime forms from a group list
#[derive(Debug, Clone, Copy)]
pub struct FormBuilder<'a> {
    groups: &'a [GroupDescriptor],
}

impl<'a> FormBuilder<'a> {
    pub fn new(groups: &'a [GroupDescriptor]) -> Self {
        Self { groups }
    }

    /// Build a fresh form; groups and fields keep schema order
    pub fn build(&self) -> Result<RuntimeForm, ConfigurationError> {
        let mut values = ValueStore::new();
        let mut groups = Vec::with_capacity(self.groups.len());

        for group in self.groups {
            let mut fields = Vec::with_capacity(group.fields.len());

            for descriptor in &group.fields {
                let key = group.field_key(descriptor);
                let Some(field) = build_field(key, descriptor) else {
                    debug!(
                        group = %group.key,
                        field = %descriptor.key,
                        "skipping field of unknown type"
                    );
                    continue;
                };

                if !values.bind(field.key.clone(), field.zero_value()) {
                    return Err(ConfigurationError::DuplicateFieldKey {
                        group: group.key.clone(),
                        field: field.key,
                    });
                }
                fields.push(field);
            }

            groups.push(RuntimeGroup {
                key: group.key.clone(),
                title: group.title.clone(),
                description: group.description.clone(),
                fields,
            });
        }

        Ok(RuntimeForm::new(groups, values))
    }
}

fn build_field(key: String, descriptor: &FieldDescriptor) -> Option<RuntimeField> {
    let kind = match descriptor.kind {
        FieldType::Input => FieldKind::Input,
        FieldType::Text => FieldKind::Text,
        FieldType::Select => FieldKind::Select {
            options: descriptor.options.clone(),
        },
        FieldType::MultiSelect => FieldKind::MultiSelect {
            options: descriptor.options.clone(),
        },
        FieldType::Range => FieldKind::Range,
        FieldType::FilePicker => FieldKind::FilePicker {
            allowed: descriptor
                .options
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
        },
        FieldType::Confirm => FieldKind::Confirm {
            affirmative: descriptor
                .affirmative
                .clone()
                .unwrap_or_else(|| DEFAULT_AFFIRMATIVE.to_string()),
            negative: descriptor
                .negative
                .clone()
                .unwrap_or_else(|| DEFAULT_NEGATIVE.to_string()),
        },
        FieldType::Unknown => return None,
    };

    let validator = match &kind {
        FieldKind::Confirm { .. } if descriptor.require_yes => Some(require_yes(&descriptor.title)),
        FieldKind::Confirm { .. } => None,
        FieldKind::Range if descriptor.mandatory => Some(required_rating(&descriptor.title)),
        _ if descriptor.mandatory => Some(required(&descriptor.title)),
        _ => None,
    };

    let mut field = RuntimeField::new(key, descriptor.title.clone(), kind);
    field.description = descriptor.description.clone();
    field.mandatory = descriptor.mandatory;
    field.validator = validator;
    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use crate::schema::builtin_schema;

    #[test]
    fn test_preserves_order_and_binds_one_slot_per_field() {
        let schema = builtin_schema().unwrap();
        let form = FormBuilder::new(&schema.data_collection).build().unwrap();

        let group_keys: Vec<&str> = form.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(group_keys, vec!["data_entry", "reviewer"]);

        let field_keys: Vec<&str> = form.fields().map(|f| f.key.as_str()).collect();
        assert_eq!(
            field_keys,
            vec![
                "data_entry_applicant_name",
                "data_entry_object_description",
                "data_entry_object_class",
                "data_entry_object_image",
                "data_entry_approval",
                "reviewer_1",
                "reviewer_2",
                "reviewer_3",
                "reviewer_4",
                "reviewer_approval",
            ]
        );
        let slot_keys: Vec<&str> = form.values().keys().collect();
        assert_eq!(slot_keys, field_keys);
    }

    #[test]
    fn test_zero_values_by_type() {
        let groups = vec![GroupDescriptor::new("g", "G")
            .with_field(FieldDescriptor::new(FieldType::MultiSelect, "tags", "Tags"))
            .with_field(FieldDescriptor::new(FieldType::Confirm, "ok", "Ok"))
            .with_field(FieldDescriptor::new(FieldType::Range, "rating", "Rating"))];
        let form = FormBuilder::new(&groups).build().unwrap();

        assert_eq!(form.values().get("g_tags"), Some(&FieldValue::List(vec![])));
        assert_eq!(form.values().get("g_ok"), Some(&FieldValue::Bool(false)));
        assert_eq!(form.values().get("g_rating"), Some(&FieldValue::text("")));
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        let groups = vec![GroupDescriptor::new("g", "G")
            .with_field(FieldDescriptor::new(FieldType::Unknown, "color", "Color"))
            .with_field(FieldDescriptor::new(FieldType::Input, "name", "Name"))];
        let form = FormBuilder::new(&groups).build().unwrap();

        assert_eq!(form.fields().count(), 1);
        assert!(form.values().get("g_color").is_none());
    }

    #[test]
    fn test_colliding_qualified_keys_rejected() {
        let groups = vec![
            GroupDescriptor::new("a_b", "AB")
                .with_field(FieldDescriptor::new(FieldType::Input, "c", "C")),
            GroupDescriptor::new("a", "A")
                .with_field(FieldDescriptor::new(FieldType::Input, "b_c", "BC")),
        ];
        assert!(matches!(
            FormBuilder::new(&groups).build(),
            Err(ConfigurationError::DuplicateFieldKey { .. })
        ));
    }

    #[test]
    fn test_instances_do_not_share_slots() {
        let schema = builtin_schema().unwrap();
        let builder = FormBuilder::new(&schema.evaluation);
        let mut first = builder.build().unwrap();
        let second = builder.build().unwrap();

        first.handle(&crate::input::InputEvent::Submit(FieldValue::text("5")));
        assert_eq!(first.get_string("appearance_rating"), "5");
        assert_eq!(second.get_string("appearance_rating"), "");
    }

    #[test]
    fn test_filepicker_extensions_normalized() {
        let groups = vec![GroupDescriptor::new("g", "G").with_field(
            FieldDescriptor::new(FieldType::FilePicker, "image", "Image").with_options(["PNG", ".jpg"]),
        )];
        let form = FormBuilder::new(&groups).build().unwrap();
        let field = form.fields().next().unwrap();
        assert_eq!(
            field.kind,
            FieldKind::FilePicker {
                allowed: vec![".png".to_string(), ".jpg".to_string()]
            }
        );
    }
}
