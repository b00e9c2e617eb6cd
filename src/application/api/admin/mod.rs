pub mod admin_router;
