mod contact_repository_impl;
mod in_memory_contact_repository;

pub use contact_repository_impl::ContactRepositoryImpl;
pub use in_memory_contact_repository::InMemoryContactRepository;
