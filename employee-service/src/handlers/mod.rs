pub mod employee_handlers;
