pub mod candidature_dto;
