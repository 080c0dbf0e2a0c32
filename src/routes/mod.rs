pub mod planning_routes;
pub mod route_routes;
