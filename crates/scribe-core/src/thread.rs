//! Comment Thread: the comments under one post, newest first.
//!
//! Nothing here is cached, so a comment is visible as soon as it is added.

use crate::{
  Error, Result,
  comment::{Comment, CommentForm, NewComment},
  pagination::{Page, PageSelector, Paginator},
  post::PostId,
  store::BlogStore,
  user::UserId,
};

/// One page of the comments on `post`.
pub async fn list_comments<S>(
  store: &S,
  post: PostId,
  selector: PageSelector,
  per_page: usize,
) -> Result<Page<Comment>>
where
  S: BlogStore,
{
  let count = store.count_comments(post).await.map_err(Error::store)?;
  let paginator = Paginator::new(count, per_page);
  let number = paginator.resolve(selector);
  let (offset, limit) = paginator.window(number);

  let items = if limit == 0 {
    Vec::new()
  } else {
    store
      .list_comments(post, limit, offset)
      .await
      .map_err(Error::store)?
  };

  Ok(paginator.page(number, items))
}

/// Validate `form` and attach it to `post` as `author`.
pub async fn add_comment<S>(
  store: &S,
  post: PostId,
  author: UserId,
  form: CommentForm,
) -> Result<Comment>
where
  S: BlogStore,
{
  let text = form.validate()?;

  store
    .get_post(post)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PostNotFound(post))?;

  store
    .create_comment(NewComment { post_id: post, author_id: author, text })
    .await
    .map_err(Error::store)
}
