// Goodreads API client: one method per remote endpoint
use crate::config::ClientConfig;
use crate::error::{ApiResult, ClientError};
use crate::options::{GroupListSort, GroupMemberSort, GroupTopicSort, SearchField};
use crate::request::{AppendMode, Params, Request, Route};
use crate::response::{envelope, expand_search_aliases, unwrap_child};
use crate::transport::{classify, HttpTransport, Transport};
use crate::xml_node::XmlNode;

/// Blocking client for the Goodreads XML API.
///
/// Every method returns `Ok(None)` when Goodreads answers 404, when the
/// expected element is missing, or when the body is not XML. A rejected key
/// is [`ApiError::Authentication`](crate::ApiError::Authentication); any
/// other failure is [`ApiError::RequestFailed`](crate::ApiError::RequestFailed).
pub struct GoodreadsClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl GoodreadsClient<HttpTransport> {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_transport(config, HttpTransport::new()?)
    }
}

impl<T: Transport> GoodreadsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        Ok(Self {
            config: config.validate()?,
            transport,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url_for(&self, request: &Request) -> String {
        request.url(&self.config.base_url, &self.config.api_key)
    }

    /// Issues `request` and returns the whole response envelope.
    pub fn fetch(&self, request: &Request) -> ApiResult<Option<XmlNode>> {
        let url = self.url_for(request);
        tracing::debug!(route = request.route.template(), "goodreads request");

        let response = self.transport.get(&url)?;
        let fetched = classify(response, &url, &self.config.api_key)?;

        Ok(envelope(fetched))
    }

    fn fetch_child(&self, request: Request, child: &str) -> ApiResult<Option<XmlNode>> {
        Ok(unwrap_child(self.fetch(&request)?, child))
    }

    pub fn author_id_by_name(&self, name: &str) -> ApiResult<Option<u64>> {
        let request = Request::new(Route::AuthorSearch, Params::scalar(name), AppendMode::Merge);
        let author = self.fetch_child(request, "author")?;

        Ok(author.and_then(|author| {
            author
                .attributes()
                .first()
                .and_then(|(_, value)| value.trim().parse::<u64>().ok())
                .filter(|id| *id != 0)
        }))
    }

    pub fn author_by_id(&self, id: u64) -> ApiResult<Option<XmlNode>> {
        let request = Request::new(Route::AuthorShow, Params::scalar(id), AppendMode::Merge);
        self.fetch_child(request, "author")
    }

    pub fn author_books(&self, id: u64, page: u32) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("id", id).with("page", page);
        let request = Request::new(Route::AuthorBooks, params, AppendMode::Append);
        self.fetch_child(request, "author")
    }

    // Two requests; the second is skipped when the name does not resolve.
    pub fn author_by_name(&self, name: &str) -> ApiResult<Option<XmlNode>> {
        match self.author_id_by_name(name)? {
            Some(id) => self.author_by_id(id),
            None => Ok(None),
        }
    }

    pub fn book_by_isbn(&self, isbn: &str) -> ApiResult<Option<XmlNode>> {
        let request = Request::new(Route::BookByIsbn, Params::scalar(isbn), AppendMode::Merge);
        self.fetch_child(request, "book")
    }

    /// Searches books. `extra` is merged over `q` and `page`, so it can
    /// override either.
    pub fn search_books(&self, query: &str, extra: Params, page: u32) -> ApiResult<Option<XmlNode>> {
        let params = Params::map()
            .with("q", query)
            .with("page", page)
            .merge(extra);
        let request = Request::new(Route::SearchBooks, params, AppendMode::Append);

        Ok(self
            .fetch_child(request, "search")?
            .map(expand_search_aliases))
    }

    pub fn search_books_in(
        &self,
        query: &str,
        field: SearchField,
        page: u32,
    ) -> ApiResult<Option<XmlNode>> {
        let extra = Params::map().with_nested("search", "field", field);
        self.search_books(query, extra, page)
    }

    pub fn search_books_by_title(&self, title: &str, page: u32) -> ApiResult<Option<XmlNode>> {
        self.search_books_in(title, SearchField::Title, page)
    }

    pub fn search_books_by_author(&self, author: &str, page: u32) -> ApiResult<Option<XmlNode>> {
        self.search_books_in(author, SearchField::Author, page)
    }

    pub fn groups_of_user(
        &self,
        user_id: u64,
        sort: GroupListSort,
        page: u32,
    ) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("sort", sort).with("page", page);
        let request = Request::new(Route::GroupList(user_id), params, AppendMode::Append);
        self.fetch_child(request, "groups")
    }

    pub fn group_members(
        &self,
        group_id: u64,
        search: Option<&str>,
        sort: Option<GroupMemberSort>,
        page: u32,
    ) -> ApiResult<Option<XmlNode>> {
        let params = Params::map()
            .with("page", page)
            .with_opt("search", search.filter(|s| !s.is_empty()))
            .with_opt("sort", sort);
        let request = Request::new(Route::GroupMembers(group_id), params, AppendMode::Merge);
        self.fetch_child(request, "group_users")
    }

    pub fn find_group(&self, query: &str, page: u32) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("q", query).with("page", page);
        let request = Request::new(Route::FindGroup, params, AppendMode::Append);
        self.fetch_child(request, "groups")
    }

    pub fn group_info(&self, group_id: u64, sort: GroupTopicSort) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("sort", sort);
        let request = Request::new(Route::GroupShow(group_id), params, AppendMode::Append);
        self.fetch_child(request, "group")
    }

    pub fn review(&self, review_id: u64) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("id", review_id);
        let request = Request::new(Route::ReviewShow, params, AppendMode::Append);
        self.fetch_child(request, "review")
    }

    pub fn user_review_of_book(&self, user_id: u64, book_id: u64) -> ApiResult<Option<XmlNode>> {
        let params = Params::map()
            .with("user_id", user_id)
            .with("book_id", book_id);
        let request = Request::new(Route::ReviewByUserAndBook, params, AppendMode::Append);
        self.fetch_child(request, "review")
    }

    pub fn series_by_author(&self, author_id: u64) -> ApiResult<Option<XmlNode>> {
        let request = Request::new(
            Route::SeriesByAuthor(author_id),
            Params::map(),
            AppendMode::Merge,
        );
        self.fetch_child(request, "series_works")
    }

    pub fn user_info_by_id(&self, user_id: u64) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("id", user_id);
        let request = Request::new(Route::UserShow, params, AppendMode::Append);
        self.fetch_child(request, "user")
    }

    pub fn user_info_by_username(&self, username: &str) -> ApiResult<Option<XmlNode>> {
        let params = Params::map().with("username", username);
        let request = Request::new(Route::UserShow, params, AppendMode::Append);
        self.fetch_child(request, "user")
    }
}
