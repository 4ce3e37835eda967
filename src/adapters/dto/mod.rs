pub mod batch_dto;
