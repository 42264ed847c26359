pub mod application {
    pub mod auth_service;
    pub mod story_service;
}

pub mod data {
    pub mod story_repository;
    pub mod user_repository;
}

pub mod domain {
    pub mod error;
    pub mod models;
    pub mod repository;
    pub mod tags;
    pub mod user;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
    pub mod security;
}

pub mod presentation {
    pub mod auth;
    pub mod handlers;
    pub mod middleware;
    pub mod routes;
}
