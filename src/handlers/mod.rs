pub mod analytics;
pub mod auth;
pub mod freelancers;
pub mod messaging;
pub mod portfolio;
pub mod quotes;
pub mod reviews;
pub mod search;
pub mod works;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (accounts, profiles, works and quotes) ──
    cfg.service(
        web::scope("/auth")
            .route("/register/freelancer/", web::post().to(auth::register_freelancer))
            .route("/register/client/", web::post().to(auth::register_client))
            .route("/login/", web::post().to(auth::login))
            .route("/logout/", web::post().to(auth::logout))
            .route("/token/refresh/", web::post().to(auth::refresh_token))
            .route("/me/", web::get().to(auth::me))
            .route("/me/", web::patch().to(auth::update_me))
            .route("/freelancer/dashboard/", web::get().to(auth::freelancer_dashboard))
            .route("/freelancer/profile/", web::patch().to(auth::update_freelancer_profile))
            .route("/client/dashboard/", web::get().to(auth::client_dashboard))
            .route("/client/profile/", web::get().to(auth::get_client_profile))
            .route("/client/profile/", web::patch().to(auth::update_client_profile))
            .route("/works/", web::get().to(works::list_my_works))
            .route("/works/", web::post().to(works::create_work))
            .route("/works/public/", web::get().to(works::list_public_works))
            .route("/works/{id}/", web::get().to(works::get_work))
            .route("/works/{id}/", web::patch().to(works::update_work))
            .route("/works/{id}/", web::delete().to(works::delete_work))
            .route("/works/{id}/quotes/", web::get().to(quotes::list_work_quotes))
            .route("/quotes/", web::get().to(quotes::list_quotes))
            .route("/quotes/create/", web::post().to(quotes::create_quote))
            .route("/quotes/{id}/", web::get().to(quotes::get_quote))
            .route("/quotes/{id}/", web::patch().to(quotes::update_quote))
            .route("/quotes/{id}/", web::delete().to(quotes::delete_quote))
            .route("/routes/", web::get().to(auth::available_routes)),
    );

    // ── Public freelancer pages ──
    cfg.service(
        web::scope("/freelancers")
            .route("/{id}/bookmark/", web::post().to(freelancers::toggle_bookmark))
            .route("/{username}/portfolio/", web::get().to(freelancers::get_public_portfolio))
            .route("/{username}/", web::get().to(freelancers::get_public_profile)),
    );

    // ── Portfolio routes (owner only, catalog is public) ──
    cfg.service(
        web::scope("/portfolio")
            .route("/mine/", web::get().to(portfolio::get_my_portfolio))
            .route("/create/", web::post().to(portfolio::create_portfolio))
            .route("/update/", web::patch().to(portfolio::update_portfolio))
            .route("/publish/", web::post().to(portfolio::toggle_publish))
            .route("/suggestions/", web::get().to(portfolio::get_suggestions))
            .route("/items/", web::get().to(portfolio::list_items))
            .route("/items/", web::post().to(portfolio::create_item))
            .route("/items/{id}/", web::get().to(portfolio::get_item))
            .route("/items/{id}/", web::patch().to(portfolio::update_item))
            .route("/items/{id}/", web::delete().to(portfolio::delete_item))
            .route("/categories/", web::get().to(portfolio::list_categories))
            .route("/categories/{id}/", web::get().to(portfolio::get_category))
            .route("/skills/", web::get().to(portfolio::list_skills)),
    );

    // ── Search routes ──
    cfg.service(
        web::scope("/search")
            .route("/", web::get().to(search::search))
            .route("/freelancers/", web::get().to(search::browse_freelancers))
            .route("/categories/", web::get().to(search::list_categories))
            .route("/recommendations/", web::get().to(search::recommendations))
            .route("/trending/", web::get().to(search::trending))
            .route("/bookmarks/", web::get().to(search::bookmarks))
            .route("/work-suggestions/", web::get().to(search::work_suggestions)),
    );

    // ── Messaging routes ──
    cfg.service(
        web::scope("/messages")
            .route("/contact/{freelancer_id}/", web::post().to(messaging::send_contact_request))
            .route("/inbox/", web::get().to(messaging::inbox))
            .route("/{id}/", web::get().to(messaging::get_conversation))
            .route("/{id}/reply/", web::post().to(messaging::reply))
            .route("/{id}/status/", web::patch().to(messaging::update_status))
            .route("/{id}/read/", web::post().to(messaging::mark_read)),
    );

    // ── Review routes ──
    cfg.service(
        web::scope("/reviews")
            .route("/mine/", web::get().to(reviews::list_mine))
            .route("/create/{freelancer_id}/", web::post().to(reviews::create_review))
            .route("/{review_id}/delete/", web::delete().to(reviews::delete_review))
            .route("/{freelancer_id}/", web::get().to(reviews::list_for_freelancer)),
    );

    // ── Analytics routes ──
    cfg.service(
        web::scope("/analytics")
            .route("/dashboard/", web::get().to(analytics::dashboard))
            .route("/views/", web::get().to(analytics::view_history))
            .route("/log/{freelancer_id}/", web::post().to(analytics::log_view)),
    );
}
