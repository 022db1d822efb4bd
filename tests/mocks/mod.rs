mod mock_document_backend;

pub use mock_document_backend::MockDocumentBackend;
