/// "Stuff" QA prompt. Replace `{context}` and `{question}` before sending.
pub const STUFF_QA_PROMPT: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";
