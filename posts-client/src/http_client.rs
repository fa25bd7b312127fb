use crate::error::PostsClientError;
use crate::{Post, PostId, PostsClient};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Clone)]
pub struct PostsHttpClient {
    client: Arc<Client>,
    base_url: String,
}

impl PostsHttpClient {
    pub async fn connect(endpoint: &str) -> Result<Self, PostsClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Arc::new(Client::builder().build()?),
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/posts{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PostsClientError> {
        let resp = req.send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PostsClientError::from_http_response(resp).await)
        }
    }
}

#[async_trait]
impl PostsClient for PostsHttpClient {
    async fn create_post(
        &mut self,
        title: String,
        content: String,
    ) -> Result<Post, PostsClientError> {
        let req = self.client.post(self.url("")).json(&serde_json::json!({
            "title": title,
            "content": content,
        }));
        Self::send(req).await
    }

    async fn list_posts(&mut self) -> Result<Vec<Post>, PostsClientError> {
        Self::send(self.client.get(self.url(""))).await
    }

    async fn list_published_posts(&mut self) -> Result<Vec<Post>, PostsClientError> {
        Self::send(self.client.get(self.url("/published"))).await
    }

    async fn get_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        Self::send(self.client.get(self.url(&format!("/{id}")))).await
    }

    async fn update_post(
        &mut self,
        id: PostId,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, PostsClientError> {
        let mut body = serde_json::Map::new();
        if let Some(title) = title {
            body.insert("title".into(), title.into());
        }
        if let Some(content) = content {
            body.insert("content".into(), content.into());
        }
        let req = self.client.patch(self.url(&format!("/{id}"))).json(&body);
        Self::send(req).await
    }

    async fn delete_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        Self::send(self.client.delete(self.url(&format!("/{id}")))).await
    }

    async fn publish_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        Self::send(self.client.patch(self.url(&format!("/{id}/publish")))).await
    }

    async fn unpublish_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        Self::send(self.client.patch(self.url(&format!("/{id}/unpublish")))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn urls_are_rooted_under_api_posts() {
        let client = PostsHttpClient::connect("http://127.0.0.1:8080/").await.unwrap();

        assert_eq!(client.url(""), "http://127.0.0.1:8080/api/posts");
        assert_eq!(
            client.url("/7/publish"),
            "http://127.0.0.1:8080/api/posts/7/publish"
        );
    }
}
