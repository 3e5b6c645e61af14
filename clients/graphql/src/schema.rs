use std::sync::Arc;

use database::{
    consts::consts::PersonId,
    model::person::{Person, PersonColumn, PersonOrder, SortDirection},
    persistence::storage::PersonStore,
};
use juniper::{
    graphql_value, EmptyMutation, EmptySubscription, FieldError, FieldResult, GraphQLEnum,
    GraphQLObject, RootNode, ID,
};

use crate::relay::{
    from_global_id, offset_to_cursor, slice, to_global_id, ConnectionArgs, PageInfo,
};

const PERSON_TYPE: &str = "Person";

#[derive(Clone)]
pub struct GraphQLContext {
    pub store: Arc<dyn PersonStore>,
}

impl GraphQLContext {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }
}

// https://graphql-rust.github.io/juniper/master/types/objects/using_contexts.html
impl juniper::Context for GraphQLContext {}

#[derive(GraphQLObject, Debug, Clone, PartialEq)]
#[graphql(name = "Person", description = "A person synced from the users directory")]
pub struct PersonNode {
    /// The ID of the object.
    pub id: ID,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl PersonNode {
    pub fn from_person(person: Person) -> PersonNode {
        PersonNode {
            id: to_global_id(PERSON_TYPE, &person.id.to_string()),
            email: person.email,
            first_name: person.first_name,
            last_name: person.last_name,
            avatar: person.avatar,
        }
    }
}

#[derive(GraphQLObject, Debug, Clone, PartialEq)]
#[graphql(description = "A Relay edge containing a `Person` and its cursor.")]
pub struct PersonEdge {
    /// The item at the end of the edge
    pub node: PersonNode,
    /// A cursor for use in pagination
    pub cursor: String,
}

#[derive(GraphQLObject, Debug, Clone, PartialEq)]
pub struct PersonsConnection {
    /// Pagination data for this connection.
    pub page_info: PageInfo,
    /// Contains the nodes in this connection.
    pub edges: Vec<PersonEdge>,
}

#[derive(GraphQLEnum, Debug, Clone, Copy, PartialEq)]
#[graphql(description = "An enumeration.")]
pub enum PersonSortEnum {
    IdAsc,
    IdDesc,
    EmailAsc,
    EmailDesc,
    FirstNameAsc,
    FirstNameDesc,
    LastNameAsc,
    LastNameDesc,
    AvatarAsc,
    AvatarDesc,
}

impl PersonSortEnum {
    pub fn to_order(self) -> PersonOrder {
        let (column, direction) = match self {
            PersonSortEnum::IdAsc => (PersonColumn::Id, SortDirection::Asc),
            PersonSortEnum::IdDesc => (PersonColumn::Id, SortDirection::Desc),
            PersonSortEnum::EmailAsc => (PersonColumn::Email, SortDirection::Asc),
            PersonSortEnum::EmailDesc => (PersonColumn::Email, SortDirection::Desc),
            PersonSortEnum::FirstNameAsc => (PersonColumn::FirstName, SortDirection::Asc),
            PersonSortEnum::FirstNameDesc => (PersonColumn::FirstName, SortDirection::Desc),
            PersonSortEnum::LastNameAsc => (PersonColumn::LastName, SortDirection::Asc),
            PersonSortEnum::LastNameDesc => (PersonColumn::LastName, SortDirection::Desc),
            PersonSortEnum::AvatarAsc => (PersonColumn::Avatar, SortDirection::Asc),
            PersonSortEnum::AvatarDesc => (PersonColumn::Avatar, SortDirection::Desc),
        };

        PersonOrder::new(column, direction)
    }
}

/// Resolves a global id to a person id, only `Person` ids are accepted
fn parse_person_id(id: &ID) -> FieldResult<PersonId> {
    let invalid = || {
        FieldError::new(
            format!("Invalid ID: {}", id.to_string()),
            graphql_value!({ "bad_request": "Invalid ID" }),
        )
    };

    let (type_name, local_id) = from_global_id(&id.to_string()).ok_or_else(invalid)?;

    if type_name != PERSON_TYPE {
        return Err(FieldError::new(
            format!("Must receive a {} id, got {}", PERSON_TYPE, type_name),
            graphql_value!({ "bad_request": "Wrong ID type" }),
        ));
    }

    local_id.parse::<i32>().map(PersonId).map_err(|_| invalid())
}

async fn get_person(context: &GraphQLContext, id: ID) -> FieldResult<Option<PersonNode>> {
    let person_id = parse_person_id(&id)?;

    let person = context.store.get(person_id).await?;

    Ok(person.map(PersonNode::from_person))
}

pub struct QueryRoot;

#[juniper::graphql_object(context = GraphQLContext)]
impl QueryRoot {
    /// Fetches an object given its ID
    async fn node(id: ID, context: &GraphQLContext) -> FieldResult<Option<PersonNode>> {
        get_person(context, id).await
    }

    async fn person(id: ID, context: &GraphQLContext) -> FieldResult<Option<PersonNode>> {
        get_person(context, id).await
    }

    async fn persons(
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
        sort: Option<Vec<PersonSortEnum>>,
        context: &GraphQLContext,
    ) -> FieldResult<PersonsConnection> {
        let args = ConnectionArgs {
            first,
            after,
            last,
            before,
        };

        let order: Vec<PersonOrder> = sort
            .unwrap_or_else(|| vec![PersonSortEnum::IdAsc])
            .into_iter()
            .map(PersonSortEnum::to_order)
            .collect();

        let total = context.store.count().await?;

        let window = slice(total, &args).map_err(|e| {
            FieldError::new(e, graphql_value!({ "bad_request": "Invalid pagination" }))
        })?;

        let people = if window.len() == 0 {
            vec![]
        } else {
            context
                .store
                .list(&order, window.start, window.len())
                .await?
        };

        let edges = people
            .into_iter()
            .enumerate()
            .map(|(i, person)| PersonEdge {
                node: PersonNode::from_person(person),
                cursor: offset_to_cursor(window.start + i),
            })
            .collect();

        Ok(PersonsConnection {
            page_info: window.page_info(),
            edges,
        })
    }
}

pub type Schema = RootNode<
    'static,
    QueryRoot,
    EmptyMutation<GraphQLContext>,
    EmptySubscription<GraphQLContext>,
>;

pub fn create_schema() -> Schema {
    Schema::new(QueryRoot {}, EmptyMutation::new(), EmptySubscription::new())
}
