//! Creating and editing posts on behalf of a signed-in author.

use crate::{
  Error, Result,
  post::{NewPost, Post, PostChanges, PostForm, PostId},
  store::BlogStore,
  user::UserId,
};

async fn validate_form<S>(store: &S, form: PostForm) -> Result<PostChanges>
where
  S: BlogStore,
{
  let group_exists = match form.group {
    Some(id) => store.get_group(id).await.map_err(Error::store)?.is_some(),
    None => false,
  };
  Ok(form.validate(group_exists)?)
}

/// Validate `form` and publish it as `author`.
pub async fn create_post<S>(store: &S, author: UserId, form: PostForm) -> Result<Post>
where
  S: BlogStore,
{
  let changes = validate_form(store, form).await?;
  store
    .create_post(NewPost {
      author_id: author,
      text:      changes.text,
      group_id:  changes.group_id,
      image:     changes.image,
    })
    .await
    .map_err(Error::store)
}

/// Replace the text, group and image of `post_id`.
///
/// Only the post's author may edit it; anyone else gets
/// [`Error::NotAuthor`].
pub async fn edit_post<S>(
  store: &S,
  editor: UserId,
  post_id: PostId,
  form: PostForm,
) -> Result<Post>
where
  S: BlogStore,
{
  let post = store
    .get_post(post_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PostNotFound(post_id))?;
  if post.author_id != editor {
    return Err(Error::NotAuthor { editor, post_id, author: post.author });
  }

  let changes = validate_form(store, form).await?;
  store
    .update_post(post_id, changes)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PostNotFound(post_id))
}
