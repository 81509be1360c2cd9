pub mod invoice;
pub mod pos_data;
