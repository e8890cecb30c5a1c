// GET / handler

use std::convert::Infallible;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Vocabulary</title>
</head>
<body>
  <h1>Look up a word</h1>
  <form id="lookup">
    <input name="word" maxlength="255" placeholder="ubiquitous" required>
    <button type="submit">Look up</button>
  </form>
  <pre id="result"></pre>
  <script>
    document.getElementById("lookup").addEventListener("submit", async (event) => {
      event.preventDefault();
      const word = new FormData(event.target).get("word");
      const token = localStorage.getItem("vocab_token");
      const headers = { "Content-Type": "application/json" };
      if (token) headers["Authorization"] = "Bearer " + token;
      const response = await fetch("/lookup", {
        method: "POST",
        headers,
        body: JSON.stringify({ word }),
      });
      document.getElementById("result").textContent =
        JSON.stringify(await response.json(), null, 2);
    });
  </script>
</body>
</html>
"#;

pub async fn home_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::html(HOME_PAGE))
}
