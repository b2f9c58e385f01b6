mod client;
mod mock_service;
mod request;
mod response;
