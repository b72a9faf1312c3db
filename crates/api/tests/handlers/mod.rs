mod calendar_test;
mod catalog_test;
mod health_test;
mod middleware_test;
