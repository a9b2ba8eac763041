use crate::ir::{
    AdditionalPolicy, ArraySchema, Component, Composition, CompositionKind, NumberSchema,
    ObjectSchema, SchemaNode, StringSchema,
};
use crate::parse::schema::{
    AdditionalProperties, ExclusiveBound, Schema, SchemaOrRef, SchemaType, TypeSet,
};

/// Extract the shape name from a `$ref` such as `#/components/schemas/Pet`.
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

/// Lower a named component schema.
pub fn lower_component(name: &str, schema_or_ref: &SchemaOrRef) -> Component {
    let description = match schema_or_ref {
        SchemaOrRef::Schema(schema) => schema.description.clone(),
        SchemaOrRef::Ref { .. } => None,
    };
    Component {
        name: name.to_string(),
        description,
        node: lower_schema_or_ref(schema_or_ref),
    }
}

/// Lower a parsed `SchemaOrRef` to a `SchemaNode`.
pub fn lower_schema_or_ref(schema_or_ref: &SchemaOrRef) -> SchemaNode {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => SchemaNode::Ref(ref_name(ref_path).to_string()),
        SchemaOrRef::Schema(schema) => lower_schema(schema),
    }
}

/// Lower a parsed `Schema` to a `SchemaNode`.
pub fn lower_schema(schema: &Schema) -> SchemaNode {
    let node = lower_shape(schema);
    match node {
        SchemaNode::Null | SchemaNode::Nullable(_) | SchemaNode::Unknown => node,
        _ if schema.nullable == Some(true) => SchemaNode::Nullable(Box::new(node)),
        _ => node,
    }
}

fn lower_shape(schema: &Schema) -> SchemaNode {
    // Composition first, in allOf > oneOf > anyOf order
    if !schema.all_of.is_empty() {
        let mut members: Vec<SchemaNode> = schema.all_of.iter().map(lower_schema_or_ref).collect();
        // Sibling properties next to allOf act as one more member
        if !schema.properties.is_empty() {
            members.push(lower_object(schema));
        }
        return SchemaNode::Composition(Composition {
            kind: CompositionKind::AllOf,
            members,
        });
    }
    if !schema.one_of.is_empty() {
        return composition(CompositionKind::OneOf, &schema.one_of);
    }
    if !schema.any_of.is_empty() {
        return composition(CompositionKind::AnyOf, &schema.any_of);
    }

    if let Some(ref value) = schema.const_value {
        return SchemaNode::Literal(vec![value.clone()]);
    }

    match &schema.schema_type {
        Some(TypeSet::Single(t)) => lower_typed(t, schema),
        Some(TypeSet::Multiple(types)) => {
            let has_null = types.contains(&SchemaType::Null);
            let non_null: Vec<&SchemaType> =
                types.iter().filter(|t| **t != SchemaType::Null).collect();
            let base = match non_null.as_slice() {
                [] if has_null => return SchemaNode::Null,
                [] => return SchemaNode::Unknown,
                [single] => lower_typed(single, schema),
                many => SchemaNode::Composition(Composition {
                    kind: CompositionKind::AnyOf,
                    members: many.iter().map(|t| lower_typed(t, schema)).collect(),
                }),
            };
            if has_null {
                SchemaNode::Nullable(Box::new(base))
            } else {
                base
            }
        }
        None => {
            // No type: infer it from the keywords present
            if !schema.properties.is_empty() || schema.additional_properties.is_some() {
                lower_object(schema)
            } else if schema.items.is_some() {
                lower_array(schema)
            } else if !schema.enum_values.is_empty() {
                SchemaNode::Literal(schema.enum_values.clone())
            } else {
                SchemaNode::Unknown
            }
        }
    }
}

fn composition(kind: CompositionKind, members: &[SchemaOrRef]) -> SchemaNode {
    SchemaNode::Composition(Composition {
        kind,
        members: members.iter().map(lower_schema_or_ref).collect(),
    })
}

fn lower_typed(schema_type: &SchemaType, schema: &Schema) -> SchemaNode {
    match schema_type {
        SchemaType::String => SchemaNode::String(StringSchema {
            format: schema.format.clone(),
            pattern: schema.pattern.clone(),
            min_length: schema.min_length,
            max_length: schema.max_length,
            enum_values: schema.enum_values.clone(),
        }),
        SchemaType::Number => lower_number(schema, false),
        SchemaType::Integer => lower_number(schema, true),
        SchemaType::Boolean => SchemaNode::Boolean,
        SchemaType::Null => SchemaNode::Null,
        SchemaType::Array => lower_array(schema),
        SchemaType::Object => lower_object(schema),
        SchemaType::Unknown => SchemaNode::Unknown,
    }
}

fn lower_number(schema: &Schema, integer: bool) -> SchemaNode {
    let (minimum, exclusive_minimum) = split_bound(schema.minimum, schema.exclusive_minimum);
    let (maximum, exclusive_maximum) = split_bound(schema.maximum, schema.exclusive_maximum);
    SchemaNode::Number(NumberSchema {
        integer,
        minimum,
        maximum,
        exclusive_minimum,
        exclusive_maximum,
        enum_values: schema.enum_values.clone(),
    })
}

/// Returns `(inclusive, exclusive)` bounds. The 3.0 boolean form moves the
/// inclusive bound over to the exclusive side.
fn split_bound(inclusive: Option<f64>, exclusive: Option<ExclusiveBound>) -> (Option<f64>, Option<f64>) {
    match exclusive {
        Some(ExclusiveBound::Value(v)) => (inclusive, Some(v)),
        Some(ExclusiveBound::Flag(true)) => (None, inclusive),
        Some(ExclusiveBound::Flag(false)) | None => (inclusive, None),
    }
}

fn lower_array(schema: &Schema) -> SchemaNode {
    SchemaNode::Array(ArraySchema {
        items: schema
            .items
            .as_ref()
            .map(|items| Box::new(lower_schema_or_ref(items))),
        min_items: schema.min_items,
        max_items: schema.max_items,
    })
}

fn lower_object(schema: &Schema) -> SchemaNode {
    let properties = schema
        .properties
        .iter()
        .map(|(name, prop)| (name.clone(), lower_schema_or_ref(prop)))
        .collect();
    let additional_properties = match &schema.additional_properties {
        None => AdditionalPolicy::Unspecified,
        Some(AdditionalProperties::Bool(false)) => AdditionalPolicy::Forbidden,
        Some(AdditionalProperties::Bool(true)) => AdditionalPolicy::Unrestricted,
        Some(AdditionalProperties::Schema(s)) => {
            AdditionalPolicy::Typed(Box::new(lower_schema_or_ref(s)))
        }
    };
    SchemaNode::Object(ObjectSchema {
        properties,
        required: schema.required.clone(),
        additional_properties,
    })
}
