//! Access-control groups.

use baas_client::{RequestSpec, Service};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::common::{execute_results, execute_value, segment};
use crate::error::Result;

/// Users and groups belonging to a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupMembers {
    pub users: Vec<String>,
    pub groups: Vec<String>,
}

impl GroupMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.users.push(user_id.into());
        self
    }

    pub fn group(mut self, group_name: impl Into<String>) -> Self {
        self.groups.push(group_name.into());
        self
    }
}

#[derive(Serialize)]
struct UpsertBody<'a> {
    #[serde(flatten)]
    members: &'a GroupMembers,
    #[serde(rename = "ACL", skip_serializing_if = "Option::is_none")]
    acl: Option<&'a Value>,
}

/// One group.
#[derive(Debug, Clone)]
pub struct Group {
    service: Service,
    name: String,
    path: String,
}

impl Group {
    /// Fails if `name` is empty.
    pub fn new(service: &Service, name: &str) -> Result<Self> {
        let path = format!("groups/{}", segment("group name", name)?);
        Ok(Self {
            service: service.clone(),
            name: name.to_string(),
            path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// List all groups.
    #[instrument(skip(service))]
    pub async fn query(service: &Service) -> Result<Vec<Value>> {
        let spec = RequestSpec::get("groups");
        Ok(execute_results(service, spec).await?.results)
    }

    /// Create the group or replace its members and ACL.
    #[instrument(skip(self, members, acl), fields(group = %self.name))]
    pub async fn upsert(
        &self,
        members: &GroupMembers,
        acl: Option<&Value>,
        etag: Option<&str>,
    ) -> Result<Value> {
        let mut spec = RequestSpec::put(&self.path).json(&UpsertBody { members, acl })?;
        if let Some(etag) = etag {
            spec = spec.query("etag", etag);
        }
        execute_value(&self.service, spec).await
    }

    #[instrument(skip(self), fields(group = %self.name))]
    pub async fn get(&self) -> Result<Value> {
        execute_value(&self.service, RequestSpec::get(&self.path)).await
    }

    #[instrument(skip(self), fields(group = %self.name))]
    pub async fn remove(&self) -> Result<Value> {
        execute_value(&self.service, RequestSpec::delete(&self.path)).await
    }

    #[instrument(skip(self, members), fields(group = %self.name))]
    pub async fn add_members(&self, members: &GroupMembers) -> Result<Value> {
        let spec = RequestSpec::put(format!("{}/addMembers", self.path)).json(members)?;
        execute_value(&self.service, spec).await
    }

    #[instrument(skip(self, members), fields(group = %self.name))]
    pub async fn remove_members(&self, members: &GroupMembers) -> Result<Value> {
        let spec = RequestSpec::put(format!("{}/removeMembers", self.path)).json(members)?;
        execute_value(&self.service, spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baas_client::ServiceConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> Service {
        Service::new(ServiceConfig::new(
            format!("{}/api", server.uri()),
            "tenant1",
            "app1",
            "masterKey",
        ))
        .unwrap()
    }

    #[test]
    fn test_upsert_body() {
        let members = GroupMembers::new().user("u1").group("g1");
        let body = serde_json::to_value(UpsertBody {
            members: &members,
            acl: None,
        })
        .unwrap();
        assert_eq!(body, json!({"users": ["u1"], "groups": ["g1"]}));
    }

    #[tokio::test]
    async fn test_upsert_with_etag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/1/tenant1/groups/group1"))
            .and(query_param("etag", "e1"))
            .and(body_json(json!({
                "users": ["u1"],
                "groups": [],
                "ACL": {"r": ["g:authenticated"]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "group1", "etag": "e2"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let group = Group::new(&service_for(&mock_server), "group1").unwrap();
        let result = group
            .upsert(
                &GroupMembers::new().user("u1"),
                Some(&json!({"r": ["g:authenticated"]})),
                Some("e1"),
            )
            .await
            .unwrap();
        assert_eq!(result["etag"], "e2");
    }

    #[tokio::test]
    async fn test_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/1/tenant1/groups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "group1"}, {"name": "group2"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let groups = Group::query(&service_for(&mock_server)).await.unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test]
    async fn test_members() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/1/tenant1/groups/group1/addMembers"))
            .and(body_json(json!({"users": ["u2"], "groups": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": ["u1", "u2"]})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/1/tenant1/groups/group1/removeMembers"))
            .and(body_json(json!({"users": ["u1"], "groups": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": ["u2"]})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let group = Group::new(&service_for(&mock_server), "group1").unwrap();
        let result = group.add_members(&GroupMembers::new().user("u2")).await.unwrap();
        assert_eq!(result["users"], json!(["u1", "u2"]));

        let result = group.remove_members(&GroupMembers::new().user("u1")).await.unwrap();
        assert_eq!(result["users"], json!(["u2"]));
    }

    #[tokio::test]
    async fn test_get_and_remove() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/1/tenant1/groups/group1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "group1"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/1/tenant1/groups/group1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let group = Group::new(&service_for(&mock_server), "group1").unwrap();
        assert_eq!(group.get().await.unwrap()["name"], "group1");
        assert_eq!(group.remove().await.unwrap(), Value::Null);
    }
}
