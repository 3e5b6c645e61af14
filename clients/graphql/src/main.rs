use actix_cors::Cors;
use actix_web::{
    get,
    middleware::{self, Condition},
    route,
    web::{self, Data},
    App, HttpResponse, HttpServer, Responder,
};
use actix_web_lab::respond::Html;
use anyhow::Context;
use clap::Parser;
use database::persistence::storage::postgres::PgStore;
use juniper::http::{graphiql::graphiql_source, GraphQLRequest};
use std::sync::Arc;

use crate::schema::{create_schema, GraphQLContext, Schema};

mod relay;
mod schema;
mod tracers;

/// GraphiQL playground UI
#[get("/graphiql")]
async fn graphql_playground() -> impl Responder {
    Html(graphiql_source("/graphql", None))
}

/// GraphQL endpoint -- triggered once per request
#[route("/graphql", method = "GET", method = "POST")]
async fn graphql(
    schema: web::Data<Schema>,
    context: web::Data<GraphQLContext>,
    data: web::Json<GraphQLRequest>,
) -> impl Responder {
    let response = data.execute(&schema, context.as_ref()).await;

    if response.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::BadRequest().json(response)
    }
}

/// Builds the CORS policy, only the frontend app may call the API from a browser
fn cors(frontend_app: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_app)
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}

/// 📇 People GraphQL Server, read-only Relay API over the persons table
#[derive(Parser, Debug)]
struct Cli {
    /// Postgres connection string, e.g. `host=localhost user=postgres` or a postgresql:// URL
    #[clap(long, env = "DATABASE_URL", default_value = "host=localhost user=postgres")]
    database_url: String,

    /// Origin of the frontend app allowed to call the API (CORS)
    #[clap(long, env = "FRONTEND_APP", default_value = "http://localhost:3000")]
    frontend_app: String,

    /// Port the graphql server will run on
    #[clap(short, long, default_value = "9000")]
    port: u16,

    /// Address the graphql server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Log every HTTP request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,

    #[clap(long, default_value = "info")]
    log_level: tracing::Level,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracers::init_tracing_subscriber(args.log_level);

    let store = PgStore::connect(&args.database_url)
        .await
        .context("Unable to connect to the database")?;

    let context = GraphQLContext::new(Arc::new(store));

    // Create Juniper schema
    let schema = Arc::new(create_schema());

    log::info!("starting HTTP server on port {}.", args.port);

    log::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        args.address,
        args.port
    );

    let frontend_app = args.frontend_app.clone();
    let log_http = args.log_http;

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(Data::from(schema.clone()))
            .app_data(web::Data::new(context.clone()))
            .service(graphql)
            .service(graphql_playground)
            .wrap(cors(&frontend_app))
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use actix_web::{http::header, test};
    use database::{model::person::PersonDraft, persistence::storage::memory::MemoryStore};
    use serde_json::{json, Value};

    use super::*;

    fn context() -> GraphQLContext {
        let store = MemoryStore::with_people(vec![PersonDraft {
            first_name: Some("Jane".to_string()),
            ..PersonDraft::new("jane@example.com")
        }])
        .unwrap();

        GraphQLContext::new(Arc::new(store))
    }

    #[actix_web::test]
    async fn graphql_endpoint_executes_queries() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(create_schema()))
                .app_data(Data::new(context()))
                .service(graphql),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({ "query": "{ persons { edges { node { email firstName } } } }" }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, request).await;

        assert_eq!(
            body,
            json!({ "data": { "persons": { "edges": [
                { "node": { "email": "jane@example.com", "firstName": "Jane" } }
            ] } } })
        );
    }

    #[actix_web::test]
    async fn invalid_query_is_a_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(create_schema()))
                .app_data(Data::new(context()))
                .service(graphql),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({ "query": "{ doesNotExist }" }))
            .to_request();

        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn cors_allows_only_the_frontend_app() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(create_schema()))
                .app_data(Data::new(context()))
                .service(graphql)
                .wrap(cors("http://localhost:3000")),
        )
        .await;

        let allowed = test::TestRequest::post()
            .uri("/graphql")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .set_json(json!({ "query": "{ persons { edges { cursor } } }" }))
            .to_request();
        let response = test::call_service(&app, allowed).await;
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );

        let blocked = test::TestRequest::post()
            .uri("/graphql")
            .insert_header((header::ORIGIN, "http://evil.example.com"))
            .set_json(json!({ "query": "{ persons { edges { cursor } } }" }))
            .to_request();
        let response = test::try_call_service(&app, blocked).await;
        let status = match response {
            Ok(response) => response.status(),
            Err(e) => e.as_response_error().status_code(),
        };
        assert_eq!(status, actix_web::http::StatusCode::BAD_REQUEST);
    }
}
