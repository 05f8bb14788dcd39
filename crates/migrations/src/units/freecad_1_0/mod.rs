pub mod attachment_support;
