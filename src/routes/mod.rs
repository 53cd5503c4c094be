pub mod alert_routes;
pub mod fuel_request_routes;
pub mod settings_routes;
pub mod vehicle_routes;
