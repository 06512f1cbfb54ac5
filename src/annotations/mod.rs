pub mod annotation_record;
pub mod annotation_serializer;
