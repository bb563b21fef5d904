//! Build pass: builder values → resolved schema graph.
//!
//! Depth-first and synchronous. Every pointer goes through the shared
//! [`BuildContext`]; the first failure anywhere aborts the whole build.
use crate::builder::{
    ArrayItemsBuilder, ArraySchemaBuilder, CompositionBuilder, MetadataBuilder, ObjectSchemaBuilder,
    SchemaBuilder, SchemaTypeBuilder,
};
use crate::error::Result;
use crate::model::{
    AllOfSchema, ArrayItems, ArraySchema, BoolOr, Metadata, ObjectSchema, OneOfSchema, Schema,
    SchemaType,
};
use crate::resolver::BuildContext;

impl SchemaBuilder {
    pub fn build(&self, ctx: &BuildContext) -> Result<Schema> {
        Ok(Schema { metadata: self.metadata.build(), ty: self.ty.build(ctx)? })
    }
}

impl MetadataBuilder {
    pub fn build(&self) -> Metadata {
        Metadata {
            title: self.title.clone(),
            description: self.description.clone(),
            default: self.default.clone(),
            enumerated_values: self.enumerated_values.clone(),
            example: self.example.clone(),
            nullable: self.nullable,
        }
    }
}

impl SchemaTypeBuilder {
    pub fn build(&self, ctx: &BuildContext) -> Result<SchemaType> {
        Ok(match self {
            SchemaTypeBuilder::Pointer(pointer) => SchemaType::Structure(ctx.resolve(pointer)?),
            SchemaTypeBuilder::Object(b) => SchemaType::Object(Box::new(b.build(ctx)?)),
            SchemaTypeBuilder::Array(b) => SchemaType::Array(Box::new(b.build(ctx)?)),
            SchemaTypeBuilder::AllOf(b) => {
                let subschemas = build_all(&b.subschemas, ctx)?;
                SchemaType::AllOf(Box::new(AllOfSchema { subschemas, is_abstract: b.is_abstract }))
            }
            SchemaTypeBuilder::OneOf(b) => SchemaType::OneOf(Box::new(b.build_one_of(ctx)?)),
            SchemaTypeBuilder::String(format, metadata) => {
                SchemaType::String(format.clone(), metadata.build())
            }
            SchemaTypeBuilder::Number(format, metadata) => {
                SchemaType::Number(format.clone(), metadata.build())
            }
            SchemaTypeBuilder::Integer(format, metadata) => {
                SchemaType::Integer(format.clone(), metadata.build())
            }
            SchemaTypeBuilder::Enumeration => SchemaType::Enumeration,
            SchemaTypeBuilder::Boolean => SchemaType::Boolean,
            SchemaTypeBuilder::File => SchemaType::File,
            SchemaTypeBuilder::Any => SchemaType::Any,
            SchemaTypeBuilder::Null => SchemaType::Null,
        })
    }
}

impl ObjectSchemaBuilder {
    pub fn build(&self, ctx: &BuildContext) -> Result<ObjectSchema> {
        let properties = self
            .properties
            .iter()
            .map(|(name, b)| Ok((name.clone(), b.build(ctx)?)))
            .collect::<Result<_>>()?;
        Ok(ObjectSchema {
            metadata: self.metadata.clone(),
            required: self.required.clone(),
            properties,
            all_properties: self.all_properties.clone(),
            additional_properties: build_additional(&self.additional_properties, ctx)?,
        })
    }
}

impl ArraySchemaBuilder {
    pub fn build(&self, ctx: &BuildContext) -> Result<ArraySchema> {
        let items = match &self.items {
            ArrayItemsBuilder::One(item) => ArrayItems::One(Box::new(item.build(ctx)?)),
            ArrayItemsBuilder::Many(items) => ArrayItems::Many(build_all(items, ctx)?),
        };
        Ok(ArraySchema {
            metadata: self.metadata.clone(),
            items,
            additional_items: build_additional(&self.additional_items, ctx)?,
        })
    }
}

impl CompositionBuilder {
    fn build_one_of(&self, ctx: &BuildContext) -> Result<OneOfSchema> {
        Ok(OneOfSchema {
            subschemas: build_all(&self.subschemas, ctx)?,
            is_abstract: self.is_abstract,
        })
    }
}

fn build_all(builders: &[SchemaBuilder], ctx: &BuildContext) -> Result<Vec<Schema>> {
    builders.iter().map(|b| b.build(ctx)).collect()
}

fn build_additional(
    additional: &BoolOr<Box<SchemaBuilder>>,
    ctx: &BuildContext,
) -> Result<BoolOr<Box<Schema>>> {
    Ok(match additional {
        BoolOr::Bool(flag) => BoolOr::Bool(*flag),
        BoolOr::Schema(b) => BoolOr::Schema(Box::new(b.build(ctx)?)),
    })
}
