//! Built-in endpoint definitions for the admin dashboard.

use serde_json::Value;

use crate::api::endpoint::{ApiRequest, Endpoint, EndpointKind, HttpMethod, Tag};
use crate::api::types::{
    DashboardArgs, DashboardData, DashboardStats, LoginRequest, LoginResponse, User, UserList,
    UserUpdate, UsersArgs,
};

const USER_TAG: &str = "User";
const DASHBOARD_TAG: &str = "Dashboard";
const USER_LIST_ID: &str = "LIST";

pub struct GetDashboardData;

impl Endpoint for GetDashboardData {
    const NAME: &'static str = "getDashboardData";
    const KIND: EndpointKind = EndpointKind::Query;
    type Args = DashboardArgs;
    type Output = DashboardData;

    fn request(args: &Self::Args) -> ApiRequest {
        ApiRequest::get("/dashboard").param("period", args.period)
    }

    fn provides_tags(_args: &Self::Args, _output: &Self::Output) -> Vec<Tag> {
        vec![Tag::kind(DASHBOARD_TAG)]
    }
}

pub struct GetDashboardStats;

impl Endpoint for GetDashboardStats {
    const NAME: &'static str = "getDashboardStats";
    const KIND: EndpointKind = EndpointKind::Query;
    type Args = ();
    type Output = DashboardStats;

    fn request(_args: &Self::Args) -> ApiRequest {
        ApiRequest::get("/dashboard/stats")
    }

    fn provides_tags(_args: &Self::Args, _output: &Self::Output) -> Vec<Tag> {
        vec![Tag::kind(DASHBOARD_TAG)]
    }
}

pub struct GetUsers;

impl Endpoint for GetUsers {
    const NAME: &'static str = "getUsers";
    const KIND: EndpointKind = EndpointKind::Query;
    type Args = UsersArgs;
    type Output = UserList;

    fn request(args: &Self::Args) -> ApiRequest {
        ApiRequest::get("/users")
            .param("page", args.page)
            .param("limit", args.limit)
            .param("search", args.search.as_ref())
    }

    fn provides_tags(_args: &Self::Args, output: &Self::Output) -> Vec<Tag> {
        let mut tags = vec![Tag::id(USER_TAG, USER_LIST_ID)];
        tags.extend(output.users.iter().map(|u| Tag::id(USER_TAG, &u.id)));
        tags
    }
}

pub struct GetUser;

impl Endpoint for GetUser {
    const NAME: &'static str = "getUser";
    const KIND: EndpointKind = EndpointKind::Query;
    type Args = String;
    type Output = User;

    fn request(id: &Self::Args) -> ApiRequest {
        ApiRequest::get("/users").segment(id)
    }

    fn provides_tags(id: &Self::Args, _output: &Self::Output) -> Vec<Tag> {
        vec![Tag::id(USER_TAG, id)]
    }
}

pub struct UpdateUser;

impl Endpoint for UpdateUser {
    const NAME: &'static str = "updateUser";
    const KIND: EndpointKind = EndpointKind::Mutation;
    type Args = UserUpdate;
    type Output = User;

    fn request(args: &Self::Args) -> ApiRequest {
        let body = serde_json::to_value(&args.changes).unwrap_or(Value::Null);
        ApiRequest::with_method(HttpMethod::Put, "/users", body).segment(&args.id)
    }

    fn invalidates_tags(args: &Self::Args) -> Vec<Tag> {
        vec![Tag::id(USER_TAG, &args.id), Tag::id(USER_TAG, USER_LIST_ID)]
    }
}

pub struct Login;

impl Endpoint for Login {
    const NAME: &'static str = "login";
    const KIND: EndpointKind = EndpointKind::Mutation;
    type Args = LoginRequest;
    type Output = LoginResponse;

    fn request(args: &Self::Args) -> ApiRequest {
        let body = serde_json::json!({
            "email": args.email,
            "password": args.password,
        });
        ApiRequest::with_method(HttpMethod::Post, "/auth/login", body)
    }
}
